//! Field rendering utilities for forms

use crate::state::FieldKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CURSOR: &str = "▌";

fn row_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn prefix(is_active: bool) -> Span<'static> {
    let marker = if is_active { "▸ " } else { "  " };
    Span::styled(marker, Style::default().fg(Color::Cyan))
}

/// Draw a boxed single-line text input
pub fn draw_field_with_value(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_active: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };
    let cursor = if is_active { CURSOR } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_value, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(style);

    frame.render_widget(content.block(block), area);
}

/// Heading line above a group of choices
pub fn heading_line(label: &str) -> Line<'_> {
    Line::from(Span::styled(
        label,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// A radio button or checkbox row
pub fn choice_line(kind: FieldKind, label: &str, checked: bool, is_active: bool) -> Line<'_> {
    let marker = match (kind, checked) {
        (FieldKind::CheckboxGroup, true) => "[x] ",
        (FieldKind::CheckboxGroup, false) => "[ ] ",
        (_, true) => "(•) ",
        (_, false) => "( ) ",
    };
    Line::from(vec![
        prefix(is_active),
        Span::styled(marker, row_style(is_active || checked)),
        Span::styled(label, row_style(is_active)),
    ])
}

/// Free-text row under an enabled "other" choice
pub fn other_line(text: &str, is_active: bool) -> Line<'_> {
    let mut spans = vec![
        prefix(is_active),
        Span::styled("    Please specify: ", Style::default().fg(Color::DarkGray)),
        Span::styled(text, row_style(is_active)),
    ];
    if is_active {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Inline labelled text input row
pub fn text_line<'a>(label: &'a str, kind: FieldKind, value: &'a str, is_active: bool) -> Line<'a> {
    let mut spans = vec![
        prefix(is_active),
        Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if value.is_empty() && !is_active {
        let placeholder = match kind {
            FieldKind::Date => "YYYY-MM-DD",
            _ => "(empty)",
        };
        spans.push(Span::styled(placeholder, Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(value, row_style(is_active)));
    }
    if is_active {
        spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

/// Draw help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
