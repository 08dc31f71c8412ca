//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Fetches run as detached tasks and report their outcome back as messages.
//!   Nothing cancels an in-flight fetch: whichever response resolves last
//!   owns its region.

use std::io;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use reco_proto::client::{ApiClient, FetchError};
use reco_proto::model::Track;
use reco_proto::query::RecommendationQuery;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{catalog_list::CatalogList, pref_form::PrefForm, results_panel::ResultsPanel},
    focus::FocusRing,
    widgets::status_bar::{self, InputMode},
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// The one startup catalog fetch resolved.
    CatalogLoaded(Result<Vec<Track>, FetchError>),
    /// A recommendation fetch resolved (seeded or preference).
    ResultsLoaded(Result<Vec<Track>, FetchError>),
}

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Stores the last-drawn layout rects for each focusable pane.
/// Used by `handle_mouse` to do hit-testing without recomputing the layout.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    catalog: Rect,
    pref_form: Rect,
    results: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    // Shared state (passed read-only to components)
    pub state: AppState,

    // Components
    catalog_list: CatalogList,
    pref_form: PrefForm,
    results_panel: ResultsPanel,

    focus: FocusRing,
    client: ApiClient,

    /// Whether to quit on next iteration.
    should_quit: bool,

    /// Last-drawn layout rects — used for mouse hit-testing.
    pane_areas: PaneAreas,
}

impl App {
    pub fn new(client: ApiClient, show_keys_bar: bool) -> Self {
        Self {
            state: AppState::new(show_keys_bar),
            catalog_list: CatalogList::new(),
            pref_form: PrefForm::new(),
            results_panel: ResultsPanel::new(),
            focus: FocusRing::new(vec![
                ComponentId::CatalogList,
                ComponentId::PrefForm,
                ComponentId::ResultsPanel,
            ]),
            client,
            should_quit: false,
            pane_areas: PaneAreas::default(),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Startup catalog fetch — exactly once, no retry ────────────────────
        self.push_log(format!("loading catalog from {}", self.client.base_url()));
        let catalog_client = self.client.clone();
        let catalog_tx = tx.clone();
        tokio::spawn(async move {
            let outcome = catalog_client.list_catalog().await;
            let _ = catalog_tx.send(AppMessage::CatalogLoaded(outcome)).await;
        });

        // ── Main loop ─────────────────────────────────────────────────────────
        loop {
            terminal.draw(|f| self.draw(f))?;

            if self.should_quit {
                break;
            }

            match rx.recv().await {
                Some(msg) => self.handle_message(msg, &tx),
                None => break,
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage, tx: &mpsc::Sender<AppMessage>) {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return;
                    }
                    let actions = self.handle_key(key);
                    for action in actions {
                        self.dispatch(action, tx);
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for action in actions {
                        self.dispatch(action, tx);
                    }
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h), tx);
                }
                _ => {}
            },

            AppMessage::CatalogLoaded(outcome) => {
                match &outcome {
                    Ok(tracks) => self.push_log(format!("catalog loaded: {} tracks", tracks.len())),
                    Err(err) => self.push_log(format!("catalog load failed: {}", err)),
                }
                self.state.apply_catalog(outcome);
                self.catalog_list.sync_catalog(&self.state);
            }

            AppMessage::ResultsLoaded(outcome) => {
                self.state.inflight = self.state.inflight.saturating_sub(1);
                match &outcome {
                    Ok(recs) => self.push_log(format!("received {} recommendations", recs.len())),
                    Err(err) => self.push_log(format!("recommendation failed: {}", err)),
                }
                self.state.apply_results(outcome);
                self.results_panel.sync_results(&self.state);
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // The preference form consumes plain characters, so single-letter
        // shortcuts only apply outside it.
        let typing = self.state.input_mode == InputMode::Filter
            || self.focus.is_focused(ComponentId::PrefForm);

        // Global keys — always active
        match key.code {
            KeyCode::Char('c') if key.modifiers == KeyModifiers::CONTROL => {
                return vec![Action::Quit];
            }
            KeyCode::Char('q') if !typing && key.modifiers == KeyModifiers::NONE => {
                return vec![Action::Quit];
            }
            KeyCode::Char('K') if !typing => {
                return vec![Action::ToggleKeys];
            }
            _ => {}
        }

        // Tab / Shift-Tab always cycle focus (closing an open filter first)
        match key.code {
            KeyCode::Tab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            KeyCode::BackTab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusPrev];
                }
                return vec![Action::FocusPrev];
            }
            _ => {}
        }

        // Number keys jump straight to a pane
        if !typing {
            match key.code {
                KeyCode::Char('1') => return vec![Action::FocusPane(ComponentId::CatalogList)],
                KeyCode::Char('2') => return vec![Action::FocusPane(ComponentId::PrefForm)],
                KeyCode::Char('3') => return vec![Action::FocusPane(ComponentId::ResultsPanel)],
                _ => {}
            }
        }

        // Dispatch to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::CatalogList) => self.catalog_list.handle_key(key, s),
            Some(ComponentId::PrefForm) => self.pref_form.handle_key(key, s),
            Some(ComponentId::ResultsPanel) => self.results_panel.handle_key(key, s),
            None => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let relevant = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !relevant {
            return vec![];
        }

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;
        let (col, row) = (event.column, event.row);

        // Focus follows the click; the pane then handles the event itself.
        if hit(areas.catalog, col, row) {
            let mut actions = self.catalog_list.handle_mouse(event, areas.catalog, s);
            if !self.focus.is_focused(ComponentId::CatalogList) {
                actions.insert(0, Action::FocusPane(ComponentId::CatalogList));
            }
            return actions;
        }
        if hit(areas.pref_form, col, row) {
            let mut actions = self.pref_form.handle_mouse(event, areas.pref_form, s);
            if !self.focus.is_focused(ComponentId::PrefForm) {
                actions.insert(0, Action::FocusPane(ComponentId::PrefForm));
            }
            return actions;
        }
        if hit(areas.results, col, row) {
            let mut actions = self.results_panel.handle_mouse(event, areas.results, s);
            if !self.focus.is_focused(ComponentId::ResultsPanel) {
                actions.insert(0, Action::FocusPane(ComponentId::ResultsPanel));
            }
            return actions;
        }

        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action, tx: &mpsc::Sender<AppMessage>) {
        // Broadcast the action to all components first, then apply it at the
        // app level; secondary actions run one level deep.
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.catalog_list.on_action(&action, s));
            out.extend(self.pref_form.on_action(&action, s));
            out.extend(self.results_panel.on_action(&action, s));
            out
        };

        self.apply_action(action, tx);

        for a in secondary {
            self.apply_action(a, tx);
        }
    }

    fn apply_action(&mut self, action: Action, tx: &mpsc::Sender<AppMessage>) {
        debug!("apply_action: {:?}", action);
        match action {
            Action::RecommendSeeded(id) => {
                self.push_log(format!("recommending from seed {}", id));
                self.spawn_recommend(RecommendationQuery::seeded(id), tx);
            }
            Action::RecommendByPrefs(prefs) => {
                self.push_log("recommending from preferences".to_string());
                self.spawn_recommend(RecommendationQuery::preference(prefs), tx);
            }

            Action::FocusNext => {
                self.focus.next();
                self.sync_filter_with_focus();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_filter_with_focus();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
                self.sync_filter_with_focus();
            }

            Action::OpenFilter => {
                self.state.input_mode = InputMode::Filter;
            }
            Action::CloseFilter => {
                self.state.input_mode = InputMode::Normal;
            }

            Action::ToggleKeys => {
                self.state.show_keys_bar = !self.state.show_keys_bar;
            }
            Action::CopyToClipboard(text) => match copy_to_clipboard(&text) {
                Ok(()) => self.push_log(format!("copied \"{}\"", text)),
                Err(err) => {
                    warn!("clipboard copy failed: {}", err);
                    self.push_log("clipboard unavailable".to_string());
                }
            },

            Action::Quit => {
                self.should_quit = true;
            }
            Action::Resize(..) => {}
        }
    }

    /// The filter belongs to the catalog pane; moving focus elsewhere closes it.
    fn sync_filter_with_focus(&mut self) {
        if !self.focus.is_focused(ComponentId::CatalogList)
            && self.state.input_mode == InputMode::Filter
        {
            self.state.input_mode = InputMode::Normal;
            self.catalog_list.close_filter();
        }
    }

    /// Spawn one recommendation fetch. Dispatches are independent: nothing
    /// cancels an in-flight request, and whichever response resolves last
    /// owns the results region.
    fn spawn_recommend(&mut self, query: RecommendationQuery, tx: &mpsc::Sender<AppMessage>) {
        self.state.inflight += 1;
        let client = self.client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.recommend(&query).await;
            let _ = tx.send(AppMessage::ResultsLoaded(outcome)).await;
        });
    }

    fn push_log(&mut self, msg: String) {
        info!("{}", msg);
        self.state.logs.push(msg);
        let overflow = self.state.logs.len().saturating_sub(100);
        if overflow > 0 {
            self.state.logs.drain(..overflow);
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let bottom_rows = if self.state.show_keys_bar { 2 } else { 1 };
        let [main_area, bottom_area] =
            Layout::vertical([Constraint::Min(8), Constraint::Length(bottom_rows)]).areas(area);

        let [catalog_area, right_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(main_area);
        let [form_area, results_area] =
            Layout::vertical([Constraint::Length(7), Constraint::Min(5)]).areas(right_area);

        self.pane_areas = PaneAreas {
            catalog: catalog_area,
            pref_form: form_area,
            results: results_area,
        };

        self.catalog_list.draw(
            frame,
            catalog_area,
            self.focus.is_focused(ComponentId::CatalogList),
            &self.state,
        );
        self.pref_form.draw(
            frame,
            form_area,
            self.focus.is_focused(ComponentId::PrefForm),
            &self.state,
        );
        self.results_panel.draw(
            frame,
            results_area,
            self.focus.is_focused(ComponentId::ResultsPanel),
            &self.state,
        );

        let [log_area, keys_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(bottom_rows - 1),
        ])
        .areas(bottom_area);

        status_bar::draw_log_bar(
            frame,
            log_area,
            self.state.logs.last().map(String::as_str),
            self.state.inflight > 0,
        );
        if self.state.show_keys_bar {
            status_bar::draw_keys_bar(
                frame,
                keys_area,
                self.state.input_mode,
                self.focus.is_focused(ComponentId::PrefForm),
            );
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    arboard::Clipboard::new()?.set_text(text.to_string())
}
