//! Landing view: location search that opens the booking wizard

use super::components::centered_rect;
use super::forms::draw_field_with_value;
use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::state::Suggestions;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let panel = centered_rect(area, 70, 16);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Heading
            Constraint::Length(3), // Location input
            Constraint::Min(0),    // Suggestions
        ])
        .split(panel);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            "Book a DJ for your event",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Tell us where it is and we'll find DJs near you",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    draw_field_with_value(
        frame,
        chunks[1],
        "Event location",
        &app.state.location_input,
        true,
    );

    draw_suggestions(frame, chunks[2], app);
}

fn draw_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let autocomplete = &app.state.autocomplete;
    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    match autocomplete.suggestions() {
        Suggestions::Hidden => {}
        Suggestions::NoResults => {
            let notice = Paragraph::new(Span::styled(
                " No results found.",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(notice, area);
        }
        Suggestions::Places(places) => {
            let items: Vec<ListItem> = places
                .iter()
                .map(|place| ListItem::new(format!(" {place}")))
                .collect();
            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
            render_scrollable_list(frame, area, list, autocomplete.selected());
        }
    }
}
