//! HTTP client for the geocoding and form-relay APIs

use super::error::DEFAULT_FAILURE_MESSAGE;
use super::{ApiError, BookingApi, Place, SubmitReceipt};
use crate::config::BookingConfig;
use crate::state::SubmissionPayload;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::time::Duration;

/// Body returned by the form relay
#[derive(Debug, Default, Deserialize)]
struct RelayReply {
    success: Option<bool>,
    message: Option<String>,
}

/// Client for the geocoding search and the form relay
pub struct HttpClient {
    http: reqwest::Client,
    geocode_url: String,
    relay_url: String,
    suggestion_limit: usize,
}

impl HttpClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &BookingConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            geocode_url: config.geocode_url.clone(),
            relay_url: config.relay_url.clone(),
            suggestion_limit: config.suggestion_limit,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.geocode_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl BookingApi for HttpClient {
    async fn search_places(&self, query: &str) -> Result<Vec<Place>, ApiError> {
        let limit = self.suggestion_limit.to_string();
        let places = self
            .http
            .get(self.search_url())
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Place>>()
            .await?;

        tracing::debug!(query, results = places.len(), "place search finished");
        Ok(places)
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, ApiError> {
        let response = self
            .http
            .post(&self.relay_url)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        interpret_relay_reply(status, &body)
    }
}

/// Decide whether the relay accepted a submission
///
/// Success needs a 2xx status and a body that does not report
/// `"success": false`.
fn interpret_relay_reply(status: u16, body: &str) -> Result<SubmitReceipt, ApiError> {
    let accepted_status = (200..300).contains(&status);

    let reply = match serde_json::from_str::<RelayReply>(body) {
        Ok(reply) => reply,
        Err(e) if accepted_status => return Err(ApiError::Decode(e.to_string())),
        Err(_) => RelayReply::default(),
    };

    if accepted_status && reply.success != Some(false) {
        Ok(SubmitReceipt {
            message: reply.message,
        })
    } else {
        Err(ApiError::Rejected {
            status,
            message: reply
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
        })
    }
}
