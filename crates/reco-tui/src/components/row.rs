//! Shared row renderer — pure mapping from one Track to one display unit.
//!
//! Used by both the catalog list and the results panel so the two regions
//! render identically. Every field travels as literal text spans; nothing in
//! a track is ever interpreted as markup, so hostile catalog data renders
//! inert.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use reco_proto::model::Track;

use crate::theme::{C_PRIMARY, C_SECONDARY, C_SELECTION_BG};

/// Rows a single track unit occupies: title line plus subtitle line.
pub const ROW_HEIGHT: usize = 2;

/// Subtitle line: `artist · genre · year`, year blank when absent.
pub fn subtitle(track: &Track) -> String {
    let year = track.year.map(|y| y.to_string()).unwrap_or_default();
    format!("{} · {} · {}", track.artist, track.genre, year)
}

/// The two-line display unit for one track.
pub fn track_item(track: &Track, selected: bool) -> ListItem<'static> {
    let title_style = if selected {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_PRIMARY)
    };

    let title = Line::from(Span::styled(track.title.clone(), title_style));
    let sub = Line::from(vec![
        Span::raw("  "),
        Span::styled(subtitle(track), Style::default().fg(C_SECONDARY)),
    ]);

    let item = ListItem::new(vec![title, sub]);
    if selected {
        item.style(Style::default().bg(C_SELECTION_BG))
    } else {
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Track {
        Track {
            id: "t42".into(),
            title: "Blue in Green".into(),
            artist: "Miles Davis".into(),
            genre: "jazz".into(),
            year: Some(1959),
        }
    }

    #[test]
    fn subtitle_joins_fields_with_middle_dots() {
        assert_eq!(subtitle(&sample()), "Miles Davis · jazz · 1959");
    }

    #[test]
    fn subtitle_renders_missing_year_blank() {
        let mut track = sample();
        track.year = None;
        assert_eq!(subtitle(&track), "Miles Davis · jazz · ");
    }

    #[test]
    fn subtitle_keeps_empty_fields_in_place() {
        let track = Track {
            id: "t1".into(),
            ..Track::default()
        };
        assert_eq!(subtitle(&track), " ·  · ");
    }

    #[test]
    fn fields_are_rendered_as_literal_text() {
        // Markup-looking data must survive verbatim as plain text content.
        let track = Track {
            id: "x".into(),
            title: "<script>alert(1)</script>".into(),
            artist: "<b>bold</b>".into(),
            genre: "g".into(),
            year: None,
        };
        assert_eq!(subtitle(&track), "<b>bold</b> · g · ");
        assert_eq!(track_item(&track, false).height(), ROW_HEIGHT);
    }
}
