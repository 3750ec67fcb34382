//! Configuration handling for the booking wizard

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_GEOCODE_URL: &str = "BOOKING_GEOCODE_URL";
pub const ENV_RELAY_URL: &str = "BOOKING_RELAY_URL";
pub const ENV_ACCESS_KEY: &str = "BOOKING_ACCESS_KEY";
pub const ENV_REDIRECT_URL: &str = "BOOKING_REDIRECT_URL";

/// Endpoints and tuning for the booking wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Base URL of the geocoding service (`/search` is appended)
    pub geocode_url: String,
    /// Form relay submission endpoint
    pub relay_url: String,
    /// Routing key the relay requires in every submission
    pub access_key: String,
    /// Confirmation page shown after a successful submission
    pub redirect_url: String,
    /// Quiet period after the last keystroke before a place search is sent
    pub debounce_ms: u64,
    /// Shortest location text that triggers a place search
    pub min_query_len: usize,
    pub suggestion_limit: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            geocode_url: "https://nominatim.openstreetmap.org".to_string(),
            relay_url: "https://api.web3forms.com/submit".to_string(),
            access_key: String::new(),
            redirect_url: "https://bookmydjs.in/matches/".to_string(),
            debounce_ms: 300,
            min_query_len: 3,
            suggestion_limit: 5,
            request_timeout_secs: 15,
            user_agent: concat!("booking-tui/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl BookingConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("in", "bookmydjs", "booking-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());

        if config.access_key.is_empty() {
            tracing::warn!("no relay access key configured; set {ENV_ACCESS_KEY}");
        }
        Ok(config)
    }

    /// Load configuration from a JSON file; a missing file yields defaults
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: BookingConfig = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets = [
            (ENV_GEOCODE_URL, &mut self.geocode_url),
            (ENV_RELAY_URL, &mut self.relay_url),
            (ENV_ACCESS_KEY, &mut self.access_key),
            (ENV_REDIRECT_URL, &mut self.redirect_url),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *target = value;
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
