//! Wizard step rendering

use super::field_renderer::{choice_line, draw_help_text, heading_line, other_line, text_line};
use crate::app::App;
use crate::state::schema::{FIELDS, OTHER};
use crate::state::{FieldRegistry, Step, StepItem};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use crate::ui::layout::draw_progress;
use crate::ui::widgets::render_scrollable_list;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the current wizard step
pub fn draw_step(frame: &mut Frame, area: Rect, app: &App) {
    let is_final = app.state.wizard.step() == Step::Final;
    let footer_height = if is_final { BUTTON_HEIGHT } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Progress
            Constraint::Min(0),                // Step body
            Constraint::Length(footer_height), // Submit button or help
        ])
        .split(area);

    draw_progress(frame, chunks[0], app);

    let block = Block::default()
        .title(format!(" {} ", app.state.wizard.step().title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if is_final {
        draw_review(frame, chunks[1], block, app.state.wizard.fields());
        draw_submit_button(frame, chunks[2], app);
    } else {
        draw_items(frame, chunks[1], block, app);
        draw_help_text(
            frame,
            chunks[2],
            " Space selects, Enter continues, PgUp goes back",
        );
    }
}

fn draw_items(frame: &mut Frame, area: Rect, block: Block, app: &App) {
    let fields = app.state.wizard.fields();
    let items = app.state.items();
    let active = app.state.active_item.min(items.len().saturating_sub(1));

    let mut previous_group: Option<&str> = None;
    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let is_active = index == active;
            let spec = item.spec();
            let mut lines = Vec::new();

            if let StepItem::Choice { .. } = item {
                if previous_group != Some(spec.id) {
                    if previous_group.is_some() {
                        lines.push(Line::from(""));
                    }
                    lines.push(heading_line(spec.label));
                }
            }
            previous_group = Some(spec.id);

            lines.push(match item {
                StepItem::Choice { spec, option } => choice_line(
                    spec.kind,
                    option.label,
                    fields.is_checked(spec.id, option.value),
                    is_active,
                ),
                StepItem::Other { id, .. } => {
                    other_line(fields.other_text(id).unwrap_or_default(), is_active)
                }
                StepItem::Text(spec) => {
                    text_line(spec.label, spec.kind, fields.text(spec.id), is_active)
                }
            });
            ListItem::new(Text::from(lines))
        })
        .collect();

    render_scrollable_list(frame, area, List::new(list_items).block(block), active);
}

fn draw_review(frame: &mut Frame, area: Rect, block: Block, fields: &FieldRegistry) {
    let mut lines = vec![
        Line::from("Please check your answers before submitting."),
        Line::from(""),
    ];
    for (label, value) in review_rows(fields) {
        lines.push(Line::from(Span::styled(
            label,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {value}"),
            Style::default().fg(Color::Cyan),
        )));
    }

    let review = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(review, area);
}

fn draw_submit_button(frame: &mut Frame, area: Rect, app: &App) {
    let loading = app.state.submission.is_loading();
    let label = if loading { "Submitting..." } else { "Submit (Enter)" };
    render_button(frame, area, label, true, !loading);
}

/// Answered fields in display order, with choice values shown by label
fn review_rows(fields: &FieldRegistry) -> Vec<(&'static str, String)> {
    FIELDS
        .iter()
        .filter_map(|spec| {
            let value = if spec.kind.is_choice() {
                let other_text = spec
                    .other_id
                    .and_then(|id| fields.other_text(id))
                    .map(str::trim)
                    .filter(|text| !text.is_empty());
                fields
                    .group_values(spec.id)
                    .into_iter()
                    .map(|value| {
                        let label = spec.option_label(value).unwrap_or(value);
                        match other_text {
                            Some(text) if value == OTHER => format!("{label}: {text}"),
                            _ => label.to_string(),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                fields.text(spec.id).trim().to_string()
            };
            (!value.is_empty()).then_some((spec.label, value))
        })
        .collect()
}
