//! Debounced place suggestions for the location input

use crate::api::{ApiError, Place};
use std::time::{Duration, Instant};

/// A place search ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub seq: u64,
    pub text: String,
}

/// What the suggestion list currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Suggestions {
    #[default]
    Hidden,
    /// The search ran and matched nothing
    NoResults,
    Places(Vec<String>),
}

/// Debounce timer and suggestion list for the location input
///
/// Every dispatched search gets a sequence number. Only the response to the
/// latest search is shown, and only while the input has not changed since
/// it was sent.
#[derive(Debug, Clone)]
pub struct Autocomplete {
    debounce: Duration,
    min_query_len: usize,
    pending: Option<(Instant, String)>,
    last_seq: u64,
    accepting: Option<u64>,
    suggestions: Suggestions,
    selected: usize,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 3)
    }
}

impl Autocomplete {
    pub fn new(debounce: Duration, min_query_len: usize) -> Self {
        Self {
            debounce,
            min_query_len,
            pending: None,
            last_seq: 0,
            accepting: None,
            suggestions: Suggestions::Hidden,
            selected: 0,
        }
    }

    /// The input text changed
    pub fn on_input(&mut self, query: &str, now: Instant) {
        self.dismiss();
        self.accepting = None;

        if query.chars().count() < self.min_query_len {
            self.pending = None;
            return;
        }
        self.pending = Some((now + self.debounce, query.to_string()));
    }

    /// When the pending search fires, if one is armed
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending search once its quiet period has passed
    pub fn poll_due(&mut self, now: Instant) -> Option<PlaceQuery> {
        match &self.pending {
            Some((at, _)) if *at <= now => {}
            _ => return None,
        }
        let (_, text) = self.pending.take()?;
        self.last_seq += 1;
        self.accepting = Some(self.last_seq);
        Some(PlaceQuery {
            seq: self.last_seq,
            text,
        })
    }

    /// Show the response to a search
    ///
    /// Returns false when the response is stale and was dropped.
    pub fn apply(&mut self, seq: u64, result: Result<Vec<Place>, ApiError>) -> bool {
        if self.accepting != Some(seq) {
            tracing::debug!(seq, latest = self.last_seq, "dropping stale place results");
            return false;
        }
        self.accepting = None;
        self.selected = 0;

        self.suggestions = match result {
            Ok(places) if places.is_empty() => Suggestions::NoResults,
            Ok(places) => {
                Suggestions::Places(places.into_iter().map(|p| p.display_name).collect())
            }
            Err(e) => {
                tracing::warn!("Error fetching locations: {e}");
                Suggestions::Hidden
            }
        };
        true
    }

    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_open(&self) -> bool {
        self.suggestions != Suggestions::Hidden
    }

    fn place_count(&self) -> usize {
        match &self.suggestions {
            Suggestions::Places(places) => places.len(),
            _ => 0,
        }
    }

    pub fn select_next(&mut self) {
        let count = self.place_count();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.place_count();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    /// Pick the highlighted place and close the list
    pub fn take_selected(&mut self) -> Option<String> {
        let picked = match std::mem::take(&mut self.suggestions) {
            Suggestions::Places(mut places) if self.selected < places.len() => {
                Some(places.swap_remove(self.selected))
            }
            _ => None,
        };
        self.selected = 0;
        picked
    }

    /// Close the list without picking anything
    pub fn dismiss(&mut self) {
        self.suggestions = Suggestions::Hidden;
        self.selected = 0;
    }

    /// Forget any pending search and hide the list
    pub fn reset(&mut self) {
        self.dismiss();
        self.pending = None;
        self.accepting = None;
    }
}
