//! CatalogList component — left pane listing the full track catalog.
//!
//! Rows appear in server order; the client never sorts. Enter (or a
//! double-click) on a row requests items similar to that track.

use std::time::Instant;

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
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
    app_state::{AppState, CatalogRegion, CATALOG_FAILED},
    component::Component,
    components::row::{self, ROW_HEIGHT},
    theme::{style_error, style_muted, C_BADGE_PENDING},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct CatalogList {
    list: ScrollableList<Track>,
    filter_input: FilterInput,
    list_state: ListState,
    /// Track last click (item index, time) for double-click detection.
    last_click: Option<(usize, Instant)>,
}

fn track_matches(track: &Track, q: &str) -> bool {
    if q.trim().is_empty() {
        return true;
    }
    let q = q.to_lowercase();
    let text = format!(
        "{} {} {}",
        track.title.to_lowercase(),
        track.artist.to_lowercase(),
        track.genre.to_lowercase()
    );
    q.split_whitespace().all(|term| text.contains(term))
}

impl CatalogList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(track_matches),
            filter_input: FilterInput::new("title, artist, genre…"),
            list_state: ListState::default(),
            last_click: None,
        }
    }

    /// Replace items from the last completed catalog fetch.
    pub fn sync_catalog(&mut self, state: &AppState) {
        self.list.set_items(state.catalog_tracks().to_vec());
    }

    /// Close the filter bar without clearing the query.
    pub fn close_filter(&mut self) {
        self.filter_input.deactivate();
    }

    /// Seeded-recommendation action for the selected row, if any.
    fn seed_action(&self) -> Vec<Action> {
        match self.list.selected_item() {
            Some(track) => vec![Action::RecommendSeeded(track.id.clone())],
            None => vec![],
        }
    }
}

impl Component for CatalogList {
    fn id(&self) -> ComponentId {
        ComponentId::CatalogList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        // Filter mode input
        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => {
                    self.list.set_filter(&q);
                    vec![]
                }
                FilterAction::Confirmed => vec![Action::CloseFilter],
                FilterAction::Cancelled => {
                    self.list.set_filter("");
                    vec![Action::CloseFilter]
                }
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => return self.seed_action(),

            KeyCode::Char('/') => {
                self.filter_input.activate();
                return vec![Action::OpenFilter];
            }

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
        // Rows inside the border, two terminal rows per track unit.
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

                if self.list.handle_click(rel_item) {
                    if is_double {
                        self.last_click = None;
                        return self.seed_action();
                    }
                    self.last_click = Some((rel_item, now));
                } else {
                    self.last_click = Some((rel_item, now));
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        // Filter can be closed from outside (Tab while filtering).
        if matches!(action, Action::CloseFilter) {
            self.filter_input.deactivate();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = match state.catalog {
            CatalogRegion::Loading => Some(Badge {
                text: "…",
                color: C_BADGE_PENDING,
            }),
            _ => None,
        };
        let block = pane_chrome("catalog", Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &state.catalog {
            CatalogRegion::Loading => {
                frame.render_widget(
                    Paragraph::new(Span::styled("  loading tracks…", style_muted())),
                    inner,
                );
                return;
            }
            CatalogRegion::Failed => {
                frame.render_widget(
                    Paragraph::new(Span::styled(format!("  {}", CATALOG_FAILED), style_error())),
                    inner,
                );
                return;
            }
            CatalogRegion::Loaded(tracks) if tracks.is_empty() => {
                frame.render_widget(
                    Paragraph::new(Span::styled("  catalog is empty", style_muted())),
                    inner,
                );
                return;
            }
            CatalogRegion::Loaded(_) => {}
        }

        if self.list.is_empty() && !self.list.filter.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  no tracks match filter", style_muted())),
                inner,
            );
            if self.filter_input.is_active() {
                let filter_area = Rect {
                    y: inner.y + inner.height.saturating_sub(1),
                    height: 1,
                    ..inner
                };
                self.filter_input.draw(frame, filter_area);
            }
            return;
        }

        let filter_rows = if self.filter_input.is_active() { 1 } else { 0 };
        let capacity = (inner.height as usize).saturating_sub(filter_rows) / ROW_HEIGHT;
        self.list.ensure_visible(capacity);
        let sel_in_view = self.list.selected_in_view(capacity);

        let items: Vec<ListItem> = self
            .list
            .visible_items(capacity)
            .into_iter()
            .enumerate()
            .map(|(view_row, (_, track))| row::track_item(track, view_row == sel_in_view))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");

        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, inner, &mut self.list_state);

        // Filter input bar drawn at bottom of inner area if active
        if self.filter_input.is_active() {
            let filter_area = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, filter_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            genre: "genre".into(),
            year: Some(2020),
        }
    }

    fn loaded_state(tracks: Vec<Track>) -> AppState {
        let mut state = AppState::new(true);
        state.apply_catalog(Ok(tracks));
        state
    }

    #[test]
    fn sync_keeps_every_row_in_response_order() {
        let state = loaded_state(vec![
            track("t3", "Gamma", "C"),
            track("t1", "Alpha", "A"),
            track("t2", "Beta", "B"),
        ]);
        let mut list = CatalogList::new();
        list.sync_catalog(&state);

        assert_eq!(list.list.total_len(), 3);
        let ids: Vec<&str> = list
            .list
            .visible_items(10)
            .into_iter()
            .map(|(_, t)| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn enter_requests_recommendations_seeded_by_the_selected_row() {
        let state = loaded_state(vec![track("t42", "Answer", "A"), track("t7", "Other", "B")]);
        let mut list = CatalogList::new();
        list.sync_catalog(&state);

        let key = KeyEvent::from(KeyCode::Enter);
        let actions = list.handle_key(key, &state);
        assert!(
            matches!(&actions[..], [Action::RecommendSeeded(id)] if id == "t42"),
            "unexpected actions: {:?}",
            actions
        );
    }

    #[test]
    fn filter_narrows_rows_without_touching_the_data() {
        let state = loaded_state(vec![
            track("t1", "Kind of Blue", "Miles"),
            track("t2", "Blue Train", "Coltrane"),
            track("t3", "Giant Steps", "Coltrane"),
        ]);
        let mut list = CatalogList::new();
        list.sync_catalog(&state);
        list.list.set_filter("blue");

        assert_eq!(list.list.len(), 2);
        assert_eq!(list.list.total_len(), 3);
        assert_eq!(state.catalog_tracks().len(), 3);
    }
}
