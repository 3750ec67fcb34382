//! Trait abstraction for the external APIs to enable mocking in tests

use super::ApiError;
use crate::state::SubmissionPayload;
use async_trait::async_trait;
use serde::Deserialize;

/// A geocoding match
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Place {
    pub display_name: String,
}

/// Relay acknowledgement of an accepted submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: Option<String>,
}

/// Operations the wizard needs from the outside world
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Look up places matching a partially typed location
    async fn search_places(&self, query: &str) -> Result<Vec<Place>, ApiError>;

    /// Post the assembled form to the relay
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, ApiError>;
}
