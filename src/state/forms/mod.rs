//! Form domain layer
//!
//! Schema, field values, validation and payload assembly for the booking
//! wizard. Nothing here knows about the terminal.

mod field;
mod payload;
pub mod schema;
mod validator;

pub use field::{FieldError, FieldRegistry};
pub use payload::{assemble, SubmissionPayload};
pub use schema::{AgeAudience, EventTypeBranch, FieldKind};
pub use validator::{validate, ValidationError};

#[cfg(test)]
pub use payload::ACCESS_KEY_FIELD;
