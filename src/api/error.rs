//! Errors returned by the external APIs

use thiserror::Error;

/// Message used when the relay rejects a submission without explaining why
pub const DEFAULT_FAILURE_MESSAGE: &str = "Form submission failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The relay answered but refused the submission
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}
