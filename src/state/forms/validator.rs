//! Per-step validation rules
//!
//! Each wizard step index has one rule set. A rule set reads the field
//! registry and either passes or names the field that blocks the step along
//! with the message to show. Checks are pure: nothing here mutates state or
//! performs IO, and the current date is passed in.

use super::field::FieldRegistry;
use super::schema::{
    self, EventTypeBranch, APPROXIMATE_DATE, DATE_SET, EVENT_DATE, EVENT_TYPE, GUEST_AGES,
    GUEST_COUNT, LANGUAGES, MUSIC_TYPES, SERVICE_TYPES, USER_EMAIL, USER_PHONE, VENUE_TYPE,
    WEDDING_EVENTS,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Format of the event date input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone pattern"));

/// Why a step cannot be left yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Field (or "other" input) that blocks the step
    pub field: &'static str,
    /// User-facing explanation
    pub message: &'static str,
}

impl ValidationError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }

    fn required(field: &'static str) -> Self {
        let message = schema::field(field).map_or(FALLBACK_MESSAGE, |f| f.required_message);
        Self::new(field, message)
    }

    fn other_missing(group: &'static str) -> Self {
        match schema::field(group) {
            Some(spec) => Self::new(spec.other_id.unwrap_or(group), spec.other_message),
            None => Self::new(group, FALLBACK_MESSAGE),
        }
    }
}

const FALLBACK_MESSAGE: &str = "Please complete this step";

/// Simple `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Exactly ten digits, no separators
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Check the rules for one step index against the current field values
pub fn validate(step: u8, fields: &FieldRegistry, today: NaiveDate) -> Result<(), ValidationError> {
    match step {
        2 => single_choice(fields, EVENT_TYPE),
        3 => match EventTypeBranch::from_event_type(fields.radio_value(EVENT_TYPE)) {
            EventTypeBranch::Wedding => any_checked(fields, WEDDING_EVENTS),
            EventTypeBranch::Standard => any_checked(fields, GUEST_AGES),
        },
        4 => single_choice(fields, GUEST_COUNT),
        5 => any_checked(fields, SERVICE_TYPES),
        6 => any_checked(fields, MUSIC_TYPES),
        7 => any_checked(fields, LANGUAGES),
        8 => single_choice(fields, VENUE_TYPE),
        9 => event_date(fields, today),
        10 => contact(fields),
        _ => Ok(()),
    }
}

/// Exactly one radio selected, and `other` carries text
fn single_choice(fields: &FieldRegistry, group: &'static str) -> Result<(), ValidationError> {
    let choice = fields
        .radio_choice(group)
        .ok_or_else(|| ValidationError::required(group))?;
    if choice.is_other() {
        other_filled(fields, group)?;
    }
    Ok(())
}

/// At least one box checked, and a checked `other` carries text
fn any_checked(fields: &FieldRegistry, group: &'static str) -> Result<(), ValidationError> {
    let values = fields.group_values(group);
    if values.is_empty() {
        return Err(ValidationError::required(group));
    }
    if values.contains(&schema::OTHER) {
        other_filled(fields, group)?;
    }
    Ok(())
}

fn other_filled(fields: &FieldRegistry, group: &'static str) -> Result<(), ValidationError> {
    let filled = fields
        .linked_other(group)
        .and_then(|other_id| fields.other_text(other_id))
        .is_some_and(|text| !text.trim().is_empty());
    if filled {
        Ok(())
    } else {
        Err(ValidationError::other_missing(group))
    }
}

fn event_date(fields: &FieldRegistry, today: NaiveDate) -> Result<(), ValidationError> {
    match fields.radio_value(DATE_SET) {
        None => Err(ValidationError::required(DATE_SET)),
        Some("yes") => {
            let raw = fields.text(EVENT_DATE).trim();
            if raw.is_empty() {
                return Err(ValidationError::required(EVENT_DATE));
            }
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                ValidationError::new(EVENT_DATE, "Please enter the date as YYYY-MM-DD")
            })?;
            if date < today {
                return Err(ValidationError::new(
                    EVENT_DATE,
                    "Please choose a date that is not in the past",
                ));
            }
            Ok(())
        }
        Some(_) => single_choice(fields, APPROXIMATE_DATE),
    }
}

fn contact(fields: &FieldRegistry) -> Result<(), ValidationError> {
    let email = fields.text(USER_EMAIL).trim();
    let phone = fields.text(USER_PHONE).trim();

    if email.is_empty() {
        return Err(ValidationError::required(USER_EMAIL));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::new(
            USER_EMAIL,
            "Please enter a valid email address",
        ));
    }
    if phone.is_empty() {
        return Err(ValidationError::required(USER_PHONE));
    }
    if !is_valid_phone(phone) {
        return Err(ValidationError::new(
            USER_PHONE,
            "Please enter a valid 10-digit phone number",
        ));
    }
    Ok(())
}
