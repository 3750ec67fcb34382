//! Dialog components for TUI

mod alert_dialog;
mod base;
mod confirm_dialog;

pub use alert_dialog::render_error_dialog;
pub use base::centered_rect;
pub use confirm_dialog::render_confirm_close_dialog;
