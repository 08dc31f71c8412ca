//! Recommendation query construction and encoding.

/// Result-count limit. Fixed at every call site.
pub const DEFAULT_K: usize = 5;

/// Raw preference field values, exactly as read from the form controls.
///
/// These stay strings on purpose: the service receives whatever the user
/// typed, in its literal form. No parsing, clamping, or coercion happens on
/// the client side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Preferences {
    pub danceability: String,
    pub energy: String,
    pub valence: String,
    pub tempo: String,
}

/// One outbound recommendation request.
///
/// Exactly one variant is active per request; seed and preference parameters
/// never mix in a single query string.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationQuery {
    /// Seeded by a track id.
    Seeded { seed: String, k: usize },
    /// Parameterized by the four preference fields.
    Preference { prefs: Preferences, k: usize },
}

impl RecommendationQuery {
    pub fn seeded(seed: impl Into<String>) -> Self {
        Self::Seeded {
            seed: seed.into(),
            k: DEFAULT_K,
        }
    }

    pub fn preference(prefs: Preferences) -> Self {
        Self::Preference {
            prefs,
            k: DEFAULT_K,
        }
    }

    /// Encode as the query-string portion of `GET /api/recommend`.
    ///
    /// The seed is percent-encoded — ids are opaque and may carry reserved
    /// characters. Preference values are embedded as-is, in the literal
    /// string form they were typed in.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Seeded { seed, k } => {
                format!("seed={}&k={}", urlencoding::encode(seed), k)
            }
            Self::Preference { prefs, k } => format!(
                "danceability={}&energy={}&valence={}&tempo={}&k={}",
                prefs.danceability, prefs.energy, prefs.valence, prefs.tempo, k
            ),
        }
    }
}
