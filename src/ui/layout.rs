//! Layout components (progress header, status bar)

use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Split the screen into content and the status bar line
pub fn create_layout(area: Rect) -> Rect {
    // Reserve bottom line for status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Draw the step indicator and progress bar
pub fn draw_progress(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.state.wizard;
    let block = Block::default()
        .title(format!(" {} ", wizard.step_label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let gauge = Gauge::default()
        .block(block)
        .gauge_style(
            Style::default()
                .fg(Color::Cyan)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .ratio(wizard.progress().clamp(0.0, 1.0))
        .label(format!("{:.0}%", wizard.progress() * 100.0));

    frame.render_widget(gauge, area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::raw(" ")];

    // View-specific hints
    let hints = get_view_hints(&app.state.current_view);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if app.state.submission.is_outstanding() && app.state.current_view == View::Wizard {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "Submitting...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> &'static str {
    match view {
        View::Landing => "type:search  ↑↓:suggestions  Enter:start  Esc:quit",
        View::Wizard => "↑↓/Tab:move  Space:select  Enter:next  PgUp:back  Esc:close",
        View::Complete => "Enter:new booking  Esc:quit",
    }
}
