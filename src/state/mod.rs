//! Application state module

mod app_state;
mod autocomplete;
pub mod forms;
mod submission;
mod wizard;

pub use app_state::*;
pub use autocomplete::*;
pub use forms::*;
pub use submission::*;
pub use wizard::*;
