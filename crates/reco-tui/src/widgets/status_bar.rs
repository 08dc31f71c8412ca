//! Status bars — bottom lines with the last log message and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_BUSY, C_IDLE, C_MODE_FILTER, C_MODE_NORMAL, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

/// Draw the log bar: busy indicator plus the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, busy: bool) {
    let bulb = if busy {
        Span::styled("●", Style::default().fg(C_BUSY))
    } else {
        Span::styled("●", Style::default().fg(C_IDLE))
    };

    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));

    let line = Line::from(vec![bulb, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, form_focused: bool) {
    let (label, label_color) = match mode {
        InputMode::Filter => ("FILTER", C_MODE_FILTER),
        InputMode::Normal => ("RECO", C_MODE_NORMAL),
    };

    let keys = match mode {
        InputMode::Filter => " type to filter  Up/Down move  Enter keep  Esc clear+close  Tab next pane",
        InputMode::Normal if form_focused => " ↑↓ field  type to edit  Enter submit  Tab next pane  Ctrl-C quit",
        InputMode::Normal => " ↑↓/jk select  Enter recommend  / filter  y copy id  Tab/1-3 panes  K keys  q quit",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(label_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
