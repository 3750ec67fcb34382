//! UI module for rendering the TUI

mod complete;
mod components;
mod forms;
mod landing;
mod layout;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_close_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    // Draw main content based on current view
    match &app.state.current_view {
        View::Landing => landing::draw(frame, main_area, app),
        View::Wizard => forms::draw_step(frame, main_area, app),
        View::Complete => complete::draw(frame, main_area, app),
    }

    // Draw status bar
    layout::draw_status_bar(frame, app);

    // Modal overlays, alerts on top
    if let Some(confirm) = &app.state.confirm_close {
        render_confirm_close_dialog(frame, confirm);
    }
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    }
}
