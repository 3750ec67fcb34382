//! Confirmation dialog for closing the wizard

use super::base::centered_rect;
use crate::state::ConfirmClose;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the "close and discard?" confirmation
pub fn render_confirm_close_dialog(frame: &mut Frame, confirm: &ConfirmClose) {
    let dialog_area = centered_rect(frame.area(), 50, 10);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            "Close booking form",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Are you sure you want to close?"),
        Line::from(Span::styled(
            "Your answers will be lost.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    // Add options with selection highlighting
    let options = [(false, "Keep editing", Color::White), (true, "Close", Color::Red)];
    for (is_close, label, base_color) in options {
        let is_selected = confirm.selected_option == is_close;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(base_color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        content.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]));

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}
