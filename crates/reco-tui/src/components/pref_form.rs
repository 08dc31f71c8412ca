//! PrefForm component — four preference fields submitted as one query.
//!
//! Field text travels verbatim: the form does no parsing, clamping, or
//! numeric validation. Whatever the user typed is what the service sees.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use reco_proto::query::Preferences;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_FILTER_FG, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::pane_chrome,
};

const FIELD_LABELS: [&str; 4] = ["danceability", "energy", "valence", "tempo"];
const FIELD_DEFAULTS: [&str; 4] = ["0.5", "0.5", "0.5", "120"];
const LABEL_WIDTH: usize = 13;

pub struct PrefForm {
    inputs: [Input; 4],
    cursor: usize,
}

impl PrefForm {
    pub fn new() -> Self {
        Self {
            inputs: FIELD_DEFAULTS.map(|v| Input::new(v.to_string())),
            cursor: 0,
        }
    }

    /// Raw field text, exactly as typed.
    pub fn values(&self) -> Preferences {
        Preferences {
            danceability: self.inputs[0].value().to_string(),
            energy: self.inputs[1].value().to_string(),
            valence: self.inputs[2].value().to_string(),
            tempo: self.inputs[3].value().to_string(),
        }
    }
}

impl Component for PrefForm {
    fn id(&self) -> ComponentId {
        ComponentId::PrefForm
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        match key.code {
            KeyCode::Up => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(FIELD_LABELS.len() - 1);
            }
            KeyCode::Down => {
                self.cursor = (self.cursor + 1) % FIELD_LABELS.len();
            }
            KeyCode::Enter => {
                return vec![Action::RecommendByPrefs(self.values())];
            }
            _ => {
                self.inputs[self.cursor]
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
            }
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if let MouseEventKind::Down(_) = event.kind {
            let rel_row = event.row.saturating_sub(area.y + 1) as usize;
            if rel_row < FIELD_LABELS.len() {
                self.cursor = rel_row;
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("preferences", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (idx, (label, input)) in FIELD_LABELS.iter().zip(&self.inputs).enumerate() {
            if idx as u16 >= inner.height {
                break;
            }
            let row_area = Rect {
                y: inner.y + idx as u16,
                height: 1,
                ..inner
            };

            let active = focused && idx == self.cursor;
            let label_style = if active {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            let value_style = if active {
                Style::default().fg(C_FILTER_FG)
            } else {
                Style::default().fg(C_PRIMARY)
            };

            let marker = if active { "▸ " } else { "  " };
            let line = Line::from(vec![
                Span::styled(marker, Style::default().fg(C_MUTED)),
                Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), label_style),
                Span::styled(input.value().to_string(), value_style),
            ]);
            frame.render_widget(Paragraph::new(line), row_area);

            if active {
                let cursor_x =
                    row_area.x + 2 + LABEL_WIDTH as u16 + input.visual_cursor() as u16;
                frame.set_cursor_position((
                    cursor_x.min(row_area.x + row_area.width.saturating_sub(1)),
                    row_area.y,
                ));
            }
        }

        // Submit hint under the fields, space permitting.
        if inner.height > FIELD_LABELS.len() as u16 {
            let hint_area = Rect {
                y: inner.y + FIELD_LABELS.len() as u16,
                height: 1,
                ..inner
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Enter requests recommendations",
                    Style::default().fg(C_MUTED),
                )),
                hint_area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form_controls() {
        let form = PrefForm::new();
        let prefs = form.values();
        assert_eq!(prefs.danceability, "0.5");
        assert_eq!(prefs.energy, "0.5");
        assert_eq!(prefs.valence, "0.5");
        assert_eq!(prefs.tempo, "120");
    }

    #[test]
    fn enter_submits_raw_field_text_without_validation() {
        let mut form = PrefForm::new();
        let state = AppState::new(true);

        // Move to tempo and type junk after the default value.
        form.cursor = 3;
        for ch in "abc".chars() {
            form.handle_key(KeyEvent::from(KeyCode::Char(ch)), &state);
        }

        let actions = form.handle_key(KeyEvent::from(KeyCode::Enter), &state);
        match &actions[..] {
            [Action::RecommendByPrefs(prefs)] => {
                assert_eq!(prefs.tempo, "120abc");
                assert_eq!(prefs.danceability, "0.5");
            }
            other => panic!("unexpected actions: {:?}", other),
        }
    }

    #[test]
    fn up_down_wrap_around_the_fields() {
        let mut form = PrefForm::new();
        let state = AppState::new(true);
        form.handle_key(KeyEvent::from(KeyCode::Up), &state);
        assert_eq!(form.cursor, 3);
        form.handle_key(KeyEvent::from(KeyCode::Down), &state);
        assert_eq!(form.cursor, 0);
    }
}
