//! Submission payload assembly
//!
//! Collapses the field registry into the flat string mapping the form relay
//! accepts. Checkbox groups become one `", "`-joined value, radios and text
//! fields map to their raw value, and enabled "other" inputs are keyed by
//! their own id.

use super::field::{Choice, FieldRegistry, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key under which the relay expects its routing key
pub const ACCESS_KEY_FIELD: &str = "access_key";

/// Separator between checked members of one group
pub const GROUP_SEPARATOR: &str = ", ";

/// Flat field name -> value mapping sent to the relay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionPayload(BTreeMap<String, String>);

impl SubmissionPayload {
    pub fn field_count(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, key: &str, value: String) {
        self.0.insert(key.to_string(), value);
    }
}

#[cfg(test)]
impl SubmissionPayload {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Build the submission body from the current field values
pub fn assemble(fields: &FieldRegistry, access_key: &str) -> SubmissionPayload {
    let mut payload = SubmissionPayload::default();

    for (id, value) in fields.iter() {
        match value {
            FieldValue::Checkboxes(members) if !members.is_empty() => {
                let joined = members
                    .iter()
                    .map(Choice::wire_value)
                    .collect::<Vec<_>>()
                    .join(GROUP_SEPARATOR);
                payload.insert(id, joined);
            }
            FieldValue::Radio(Some(choice)) => payload.insert(id, choice.value().to_string()),
            FieldValue::Single(text) if !text.is_empty() => payload.insert(id, text.clone()),
            _ => {}
        }
    }

    for (other_id, text) in fields.enabled_others() {
        let text = text.trim();
        if !text.is_empty() {
            payload.insert(other_id, text.to_string());
        }
    }

    payload.insert(ACCESS_KEY_FIELD, access_key.to_string());
    payload
}
