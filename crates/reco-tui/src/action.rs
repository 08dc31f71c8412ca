//! Action enum — all user-initiated intents and internal events.

use reco_proto::query::Preferences;

/// Unique identifier for a focusable pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    CatalogList,
    PrefForm,
    ResultsPanel,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Recommendations ──────────────────────────────────────────────────────
    /// Request items similar to the track with this id (opaque seed).
    RecommendSeeded(String),
    /// Request items matching the four raw preference field values.
    RecommendByPrefs(Preferences),

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Filter ───────────────────────────────────────────────────────────────
    OpenFilter,
    CloseFilter,

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleKeys,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
    Resize(u16, u16),
}
