//! ResultsPanel component — right pane showing the last resolved
//! recommendation outcome.
//!
//! The region holds exactly one of: the initial empty hint, a list of
//! recommended tracks, the distinct no-matches placeholder, or the failure
//! placeholder. Rows are the same display units as the catalog, so a result
//! row can itself seed the next request.

use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use reco_proto::model::Track;

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, ResultsRegion, RESULTS_FAILED, RESULTS_NO_MATCHES},
    component::Component,
    components::row::{self, ROW_HEIGHT},
    theme::{style_error, style_muted, C_BADGE_PENDING},
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct ResultsPanel {
    list: ScrollableList<Track>,
    list_state: ListState,
    last_click: Option<(usize, Instant)>,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(|_: &Track, _: &str| true),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    /// Replace items from the last resolved recommendation outcome.
    pub fn sync_results(&mut self, state: &AppState) {
        let tracks = match &state.results {
            ResultsRegion::Loaded(tracks) => tracks.clone(),
            _ => Vec::new(),
        };
        self.list.set_items(tracks);
    }

    fn seed_action(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(track) => vec![Action::RecommendSeeded(track.id.clone())],
            None => vec![],
        }
    }
}

impl Component for ResultsPanel {
    fn id(&self) -> ComponentId {
        ComponentId::ResultsPanel
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            // Chain: recommend from a recommended track.
            KeyCode::Enter => return self.seed_action(),

            KeyCode::Char('y') => {
                if let Some(track) = self.list.selected_item() {
                    return vec![Action::CopyToClipboard(track.id.clone())];
                }
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_item = event.row.saturating_sub(area.y + 1) as usize / ROW_HEIGHT;
        match event.kind {
            MouseEventKind::ScrollUp => self.list.select_up(1),
            MouseEventKind::ScrollDown => self.list.select_down(1),
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left) => {
                let now = Instant::now();
                let is_double = self
                    .last_click
                    .map(|(item, t)| item == rel_item && t.elapsed().as_millis() < 400)
                    .unwrap_or(false);

                if self.list.handle_click(rel_item) && is_double {
                    self.last_click = None;
                    return self.seed_action();
                }
                self.last_click = Some((rel_item, now));
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = if state.inflight > 0 {
            Some(Badge {
                text: "…",
                color: C_BADGE_PENDING,
            })
        } else {
            None
        };
        let block = pane_chrome("recommendations", Some('3'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &state.results {
            ResultsRegion::Empty => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        "  pick a track or submit preferences",
                        style_muted(),
                    )),
                    inner,
                );
            }
            ResultsRegion::NoMatches => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {}", RESULTS_NO_MATCHES),
                        style_muted(),
                    )),
                    inner,
                );
            }
            ResultsRegion::Failed => {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("  {}", RESULTS_FAILED), style_error())),
                    inner,
                );
            }
            ResultsRegion::Loaded(_) => {
                let capacity = inner.height as usize / ROW_HEIGHT;
                self.list.ensure_visible(capacity);
                let sel_in_view = self.list.selected_in_view(capacity);

                let items: Vec<ListItem> = self
                    .list
                    .visible_items(capacity)
                    .into_iter()
                    .enumerate()
                    .map(|(view_row, (_, track))| {
                        row::track_item(track, focused && view_row == sel_in_view)
                    })
                    .collect();

                let list = List::new(items)
                    .highlight_style(Style::default())
                    .highlight_symbol("");

                self.list_state.select(Some(sel_in_view));
                frame.render_stateful_widget(list, inner, &mut self.list_state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track {
            id: id.into(),
            title: format!("Track {}", id),
            artist: "Artist".into(),
            genre: "genre".into(),
            year: None,
        }
    }

    #[test]
    fn sync_mirrors_the_loaded_region_and_clears_otherwise() {
        let mut state = AppState::new(true);
        let mut panel = ResultsPanel::new();

        state.apply_results(Ok(vec![track("r1"), track("r2")]));
        panel.sync_results(&state);
        assert_eq!(panel.list.total_len(), 2);

        state.apply_results(Ok(Vec::new()));
        panel.sync_results(&state);
        assert_eq!(panel.list.total_len(), 0);
    }

    #[test]
    fn enter_chains_a_seeded_request_from_a_result_row() {
        let mut state = AppState::new(true);
        state.apply_results(Ok(vec![track("r9")]));
        let mut panel = ResultsPanel::new();
        panel.sync_results(&state);

        let actions = panel.handle_key(KeyEvent::from(KeyCode::Enter), &state);
        assert!(matches!(&actions[..], [Action::RecommendSeeded(id)] if id == "r9"));
    }
}
