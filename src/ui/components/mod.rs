//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_button, BUTTON_HEIGHT};
pub use dialog::{centered_rect, render_confirm_close_dialog, render_error_dialog};
