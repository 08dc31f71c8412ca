//! Wire types for the recommendation service HTTP contract.

use serde::{Deserialize, Serialize};

/// One media item, as served by the catalog and recommendation endpoints.
///
/// Tracks are immutable once received: the client renders whole lists and
/// never merges partial updates. Display fields default to empty when absent
/// on the wire so a sparse record still renders (blank, not an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Track {
    /// Opaque stable identifier. Only ever used verbatim as a seed value,
    /// never parsed.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    /// Release year, display-only. Absent on the wire renders blank.
    #[serde(default)]
    pub year: Option<i32>,
}

/// Response body of `GET /api/tracks`.  The `tracks` field is required:
/// a body without it is a decode failure, not an empty catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub tracks: Vec<Track>,
}

/// Response body of `GET /api/recommend`.  An empty list is a valid,
/// successful response (the "no matches" outcome).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Track>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_deserializes_full_record() {
        let json = r#"{"id":"t42","title":"Blue","artist":"Ana","genre":"jazz","year":1999}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, "t42");
        assert_eq!(track.title, "Blue");
        assert_eq!(track.artist, "Ana");
        assert_eq!(track.genre, "jazz");
        assert_eq!(track.year, Some(1999));
    }

    #[test]
    fn track_absent_fields_default_to_blank() {
        let track: Track = serde_json::from_str(r#"{"id":"t1"}"#).unwrap();
        assert_eq!(track.title, "");
        assert_eq!(track.artist, "");
        assert_eq!(track.genre, "");
        assert_eq!(track.year, None);
    }

    #[test]
    fn catalog_response_requires_tracks_field() {
        assert!(serde_json::from_str::<CatalogResponse>("{}").is_err());
        let body: CatalogResponse = serde_json::from_str(r#"{"tracks":[]}"#).unwrap();
        assert!(body.tracks.is_empty());
    }

    #[test]
    fn recommend_response_preserves_order() {
        let json = r#"{"recommendations":[{"id":"a"},{"id":"b"},{"id":"c"}]}"#;
        let body: RecommendResponse = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = body.recommendations.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
