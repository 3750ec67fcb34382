//! Alert dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render an alert overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, message: &str) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::raw("Press "),
        Span::styled("Enter", key_style),
        Span::raw(" or "),
        Span::styled("Esc", key_style),
        Span::raw(" to continue"),
    ];

    let is_failure = message.starts_with("Error");
    let color = if is_failure { Color::Red } else { Color::Yellow };

    render_dialog(
        frame,
        DialogConfig {
            title: if is_failure { "Error" } else { "Alert" },
            title_color: color,
            border_color: color,
            message,
            hint: Some(hint),
            max_width: 60,
        },
    );
}
