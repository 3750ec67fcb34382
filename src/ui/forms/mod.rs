//! Form rendering module
//!
//! - `field_renderer`: row and input rendering utilities
//! - `step_form`: the wizard steps and the final review

mod field_renderer;
mod step_form;

pub use field_renderer::draw_field_with_value;
pub use step_form::draw_step;
