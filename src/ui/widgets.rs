//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    widgets::{List, ListState},
    Frame,
};

/// Render a list that scrolls to keep the selected item visible.
///
/// # Example
/// ```ignore
/// let list = List::new(items).block(block);
/// render_scrollable_list(frame, area, list, app.state.active_item);
/// ```
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}
