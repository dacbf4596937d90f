//! Preview area rendering

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::document::Element;
use crate::state::AppState;

/// Render the preview area
pub fn render_preview(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Preview ",
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.document.preview() {
        Some(element) => render_signature(frame, inner, element, state),
        None => render_placeholder(frame, inner),
    }
}

fn render_signature(frame: &mut Frame, area: Rect, element: &Element, state: &AppState) {
    let mut ink = Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC);
    if let Some(color) = state.color_support.ink(&element.style.color) {
        ink = ink.fg(color);
    }

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(element.text.clone(), ink)),
        Line::from(Span::styled(
            format!("{} · {}", element.style.font_family, element.style.color),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    match &state.glyph_preview {
        Some(rows) => {
            let glyph_style = ink.remove_modifier(Modifier::BOLD | Modifier::ITALIC);
            lines.extend(
                rows.iter()
                    .map(|row| Line::from(Span::styled(row.clone(), glyph_style))),
            );
        }
        None if state.config.ui.show_glyph_preview => {
            lines.push(Line::from(Span::styled(
                "Rendering...",
                Style::default().fg(Color::DarkGray),
            )));
        }
        None => {}
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// Render placeholder when nothing has been generated
fn render_placeholder(frame: &mut Frame, area: Rect) {
    let message = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No signature yet",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Type a name and press [G]",
            Style::default().fg(Color::Green),
        )),
    ];

    let widget = Paragraph::new(message)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

    frame.render_widget(widget, area);
}
