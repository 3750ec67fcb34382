//! Confirmation shown after a successful submission

use super::components::centered_rect;
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(area, 64, 10);

    let mut lines = vec![
        Line::from(Span::styled(
            "Thank you! Your booking request has been sent.",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(url) = &app.state.redirect_url {
        lines.push(Line::from("See your DJ matches at:"));
        lines.push(Line::from(Span::styled(
            url.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
        )));
    }

    let block = Block::default()
        .title(" Booking sent ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let message = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, panel);
}
