//! AppState — shared read-only data passed to all components during
//! render/event handling.
//!
//! Components read this, but never mutate it. The App event-loop is the only
//! thing that writes to AppState, and every region write is a total
//! replacement: a region always shows the result of exactly one completed
//! fetch attempt, never a partial or merged render.

use reco_proto::client::FetchError;
use reco_proto::model::Track;

use crate::widgets::status_bar::InputMode;

/// Placeholder shown when the startup catalog fetch fails.
pub const CATALOG_FAILED: &str = "Failed to load tracks.";
/// Placeholder shown when a recommendation fetch fails.
pub const RESULTS_FAILED: &str = "Failed to fetch recommendations.";
/// Placeholder for a well-formed response carrying zero entries.
pub const RESULTS_NO_MATCHES: &str = "No recommendations found.";

/// Catalog region — always the last completed full-catalog fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogRegion {
    /// Startup fetch still in flight.
    #[default]
    Loading,
    /// Tracks in server order. The client never sorts them.
    Loaded(Vec<Track>),
    /// The one startup fetch failed. There is no retry.
    Failed,
}

/// Results region — the last resolved recommendation outcome.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsRegion {
    /// Initial state, before any recommendation was requested.
    #[default]
    Empty,
    Loaded(Vec<Track>),
    /// Well-formed response with zero entries — not a failure.
    NoMatches,
    Failed,
}

/// The full shared state of the application.
pub struct AppState {
    pub catalog: CatalogRegion,
    pub results: ResultsRegion,
    /// Recommendation requests currently in flight. Display-only: an
    /// outstanding request never blocks a new dispatch.
    pub inflight: usize,
    pub input_mode: InputMode,
    pub show_keys_bar: bool,
    /// Recent log lines, newest last.
    pub logs: Vec<String>,
}

impl AppState {
    pub fn new(show_keys_bar: bool) -> Self {
        Self {
            catalog: CatalogRegion::default(),
            results: ResultsRegion::default(),
            inflight: 0,
            input_mode: InputMode::Normal,
            show_keys_bar,
            logs: Vec::new(),
        }
    }

    /// Commit a resolved catalog fetch. Total replacement of the region;
    /// failure is contained here and never reaches the results region.
    pub fn apply_catalog(&mut self, outcome: Result<Vec<Track>, FetchError>) {
        self.catalog = match outcome {
            Ok(tracks) => CatalogRegion::Loaded(tracks),
            Err(err) => {
                tracing::warn!("catalog fetch failed: {}", err);
                CatalogRegion::Failed
            }
        };
    }

    /// Commit a resolved recommendation fetch.
    ///
    /// Whichever outcome resolves last owns the region — there is no
    /// request-token discipline, so a stale response can overwrite a newer
    /// one (see the overlapping-dispatch test below).
    pub fn apply_results(&mut self, outcome: Result<Vec<Track>, FetchError>) {
        self.results = match outcome {
            Ok(recs) if recs.is_empty() => ResultsRegion::NoMatches,
            Ok(recs) => ResultsRegion::Loaded(recs),
            Err(err) => {
                tracing::warn!("recommendation fetch failed: {}", err);
                ResultsRegion::Failed
            }
        };
    }

    /// Tracks of the last successful catalog fetch, or empty.
    pub fn catalog_tracks(&self) -> &[Track] {
        match &self.catalog {
            CatalogRegion::Loaded(tracks) => tracks,
            _ => &[],
        }
    }
}
