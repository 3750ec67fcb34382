//! Single-flight guard for form submission

use crate::api::{ApiError, SubmitReceipt};

/// How a finished submission turned out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; show the confirmation page
    Redirect(String),
    /// Rejected or failed; the message is shown to the user
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    /// A request is outstanding. `abandoned` is set when the wizard was
    /// closed before the relay answered.
    InFlight { abandoned: bool },
    Done,
}

/// Tracks whether a submission is in flight
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionCoordinator {
    phase: Phase,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Whether a request is on the wire, abandoned or not
    pub fn is_outstanding(&self) -> bool {
        matches!(self.phase, Phase::InFlight { .. })
    }

    /// Claim the submission slot. Returns false if one is already running.
    pub fn try_begin(&mut self) -> bool {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "submission already in flight, ignoring");
            return false;
        }
        self.phase = Phase::InFlight { abandoned: false };
        true
    }

    /// Record the relay's answer
    ///
    /// A failure releases the slot so the user can retry. Success keeps it
    /// held since the wizard is done. The answer to an abandoned request
    /// only frees the slot and yields no outcome.
    pub fn finish(
        &mut self,
        result: Result<SubmitReceipt, ApiError>,
        redirect_url: &str,
    ) -> Option<SubmitOutcome> {
        if self.phase == (Phase::InFlight { abandoned: true }) {
            tracing::info!(ok = result.is_ok(), "dropping reply to a closed booking");
            self.phase = Phase::Idle;
            return None;
        }

        match result {
            Ok(receipt) => {
                tracing::info!(message = ?receipt.message, "form submitted");
                self.phase = Phase::Done;
                Some(SubmitOutcome::Redirect(redirect_url.to_string()))
            }
            Err(e) => {
                tracing::error!("Error submitting form: {e}");
                self.phase = Phase::Idle;
                Some(SubmitOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Forget a finished submission
    ///
    /// An outstanding request keeps the slot until its reply arrives.
    pub fn reset(&mut self) {
        self.phase = match self.phase {
            Phase::InFlight { .. } => Phase::InFlight { abandoned: true },
            Phase::Idle | Phase::Done => Phase::Idle,
        };
    }
}
