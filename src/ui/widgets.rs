//! Control panel widgets

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::document::Action;
use crate::state::{AppState, Field};

/// Render the name/font/color fields and the action buttons
pub fn render_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Signature ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Room left for a value after "▸ Label: " and the hint
    let value_width = (inner.width as usize).saturating_sub(16);

    let mut lines = Vec::new();
    for (index, field) in Field::all().iter().enumerate() {
        let is_selected = state.selected == index;
        let (value, hint) = match field {
            Field::Name => (state.name_input.as_str(), None),
            Field::Font => (state.style.font(), Some("[←/→]")),
            Field::Color => (state.style.color(), Some("[←/→]")),
        };

        if state.editing == Some(*field) {
            lines.push(create_edit_line(field.label(), &state.edit_buffer, value_width));
            continue;
        }

        let display = if value.is_empty() {
            "[Press Enter to type...]".to_string()
        } else {
            truncate_to_width(value, value_width)
        };
        lines.push(create_setting_line(
            field.label(),
            &display,
            is_selected,
            hint,
        ));
    }

    lines.push(Line::from(""));
    lines.push(create_action_line("[G]", "Generate Signature", true));
    lines.push(create_action_line(
        "[D]",
        if state.is_exporting {
            "Downloading..."
        } else {
            "Download"
        },
        state.document.is_enabled(Action::Download),
    ));
    lines.push(create_action_line(
        "[C]",
        "Copy",
        state.document.is_enabled(Action::Copy),
    ));

    let widget = Paragraph::new(lines);
    frame.render_widget(widget, inner);
}

/// Shorten `text` to at most `max_width` terminal columns, marking the cut
pub(crate) fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(grapheme);
    }
    out.push_str("...");
    out
}

/// Keep the tail of the buffer visible while typing
fn tail_to_width(text: &str, max_width: usize) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut used = 0;
    for grapheme in text.graphemes(true).rev() {
        let w = grapheme.width();
        if used + w > max_width {
            break;
        }
        used += w;
        kept.push(grapheme);
    }
    kept.into_iter().rev().collect()
}

fn create_edit_line(label: &str, buffer: &str, max_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::styled("▸ ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}: ", label),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{}▌", tail_to_width(buffer, max_width.saturating_sub(1))),
            Style::default().fg(Color::Green),
        ),
    ])
}

/// Create a setting line with label, value, and optional hint
fn create_setting_line(
    label: &str,
    value: &str,
    is_selected: bool,
    hint: Option<&str>,
) -> Line<'static> {
    let indicator = if is_selected { "▸" } else { " " };
    let indicator_style = Style::default().fg(Color::Cyan);

    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let value_style = if is_selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!("{} ", indicator), indicator_style),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(value.to_string(), value_style),
    ];

    if let (Some(hint_text), true) = (hint, is_selected) {
        spans.push(Span::styled(
            format!(" {}", hint_text),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Create an action line (button-like), dimmed while disabled
fn create_action_line(key: &str, label: &str, enabled: bool) -> Line<'static> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Green),
            Style::default().fg(Color::White),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };

    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(key.to_string(), key_style),
        Span::styled(format!(" {}", label), label_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_to_width("Jane Doe", 20), "Jane Doe");
    }

    #[test]
    fn test_truncate_counts_columns_not_bytes() {
        // Each CJK character takes two columns
        assert_eq!(truncate_to_width("山田太郎花子", 8), "山田...");
        assert_eq!(truncate_to_width("Brush Script MT, cursive", 10), "Brush S...");
    }

    #[test]
    fn test_tail_keeps_end_of_buffer() {
        assert_eq!(tail_to_width("Jane Doe", 3), "Doe");
        assert_eq!(tail_to_width("José", 10), "José");
    }
}
