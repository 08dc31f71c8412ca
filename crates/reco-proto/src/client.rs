//! HTTP client for the recommendation service.

pub use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::model::{CatalogResponse, RecommendResponse, Track};
use crate::query::RecommendationQuery;

/// What went wrong at the fetch boundary.
///
/// The UI collapses every variant into one placeholder per region; the
/// distinction exists for logs and for tests, which construct each failure
/// kind deterministically.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network unreachable, connection reset, request aborted.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The service answered with a non-success status. The body is ignored.
    #[error("server returned status {0}")]
    Protocol(StatusCode),
    /// The body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Thin wrapper over `reqwest::Client`, bound to one service origin.
///
/// Cheap to clone; every fetch task gets its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/tracks` — the full catalog, in server order.
    pub async fn list_catalog(&self) -> Result<Vec<Track>, FetchError> {
        let url = format!("{}/api/tracks", self.base_url);
        let body: CatalogResponse = self.get_json(&url).await?;
        Ok(body.tracks)
    }

    /// `GET /api/recommend?…` — recommendations for a seeded or preference
    /// query. An empty list is a successful outcome, not an error.
    pub async fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Track>, FetchError> {
        let url = format!(
            "{}/api/recommend?{}",
            self.base_url,
            query.to_query_string()
        );
        let body: RecommendResponse = self.get_json(&url).await?;
        Ok(body.recommendations)
    }

    async fn get_json<T>(&self, url: &str) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Protocol(status));
        }

        response.json().await.map_err(FetchError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped_from_base_url() {
        let client = ApiClient::new("http://127.0.0.1:8000///");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }
}
