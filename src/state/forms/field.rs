//! Form field value objects and the field registry

use super::schema::{self, FieldKind, FIELDS, OTHER};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// A selected member of a radio or checkbox group
///
/// The `other` sentinel carries the text typed into its linked input, so the
/// flag and the text can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Choice {
    Value(String),
    Other(String),
}

impl Choice {
    /// Build a choice from a raw option value
    pub fn new(value: &str) -> Self {
        if value == OTHER {
            Choice::Other(String::new())
        } else {
            Choice::Value(value.to_string())
        }
    }

    /// The raw option value (`other` for the sentinel)
    pub fn value(&self) -> &str {
        match self {
            Choice::Value(v) => v,
            Choice::Other(_) => OTHER,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(self, Choice::Other(_))
    }

    /// Value as sent to the relay; `other:<text>` once text has been entered
    pub fn wire_value(&self) -> String {
        match self {
            Choice::Value(v) => v.clone(),
            Choice::Other(text) => {
                let text = text.trim();
                if text.is_empty() {
                    OTHER.to_string()
                } else {
                    format!("{OTHER}:{text}")
                }
            }
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Single(String),
    Radio(Option<Choice>),
    Checkboxes(Vec<Choice>),
}

impl FieldValue {
    fn empty_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Radio => FieldValue::Radio(None),
            FieldKind::CheckboxGroup => FieldValue::Checkboxes(Vec::new()),
            FieldKind::Text | FieldKind::Date | FieldKind::Email | FieldKind::Phone => {
                FieldValue::Single(String::new())
            }
        }
    }

    /// Whether nothing has been entered or selected
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(s) => s.is_empty(),
            FieldValue::Radio(choice) => choice.is_none(),
            FieldValue::Checkboxes(members) => members.is_empty(),
        }
    }

    fn other(&self) -> Option<&String> {
        match self {
            FieldValue::Radio(Some(Choice::Other(text))) => Some(text),
            FieldValue::Checkboxes(members) => members.iter().find_map(|c| match c {
                Choice::Other(text) => Some(text),
                Choice::Value(_) => None,
            }),
            _ => None,
        }
    }

    fn other_mut(&mut self) -> Option<&mut String> {
        match self {
            FieldValue::Radio(Some(Choice::Other(text))) => Some(text),
            FieldValue::Checkboxes(members) => members.iter_mut().find_map(|c| match c {
                Choice::Other(text) => Some(text),
                Choice::Value(_) => None,
            }),
            _ => None,
        }
    }
}

/// Errors raised when a field is addressed in a way its kind does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("field `{field}` is not a {expected}")]
    KindMismatch {
        field: String,
        expected: &'static str,
    },
    #[error("`{0}` is disabled until its \"other\" choice is selected")]
    OtherDisabled(String),
}

/// Current value of every form field, keyed by field id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRegistry {
    values: BTreeMap<String, FieldValue>,
    /// Free-text id -> owning group id
    links: BTreeMap<String, String>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Create a registry with every schema field empty and every "other" input linked
    pub fn new() -> Self {
        let mut registry = Self {
            values: FIELDS
                .iter()
                .map(|f| (f.id.to_string(), FieldValue::empty_for(f.kind)))
                .collect(),
            links: BTreeMap::new(),
        };
        for spec in FIELDS {
            if let Some(other_id) = spec.other_id {
                registry.link_other(spec.id, other_id);
            }
        }
        registry
    }

    /// Link a free-text input to the group whose `other` choice enables it
    pub fn link_other(&mut self, group: &str, other_id: &str) {
        self.links.insert(other_id.to_string(), group.to_string());
    }

    /// The free-text input linked to a group, if any
    pub fn linked_other(&self, group: &str) -> Option<&str> {
        self.links
            .iter()
            .find(|(_, owner)| owner.as_str() == group)
            .map(|(other_id, _)| other_id.as_str())
    }

    /// Iterate all fields in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text of a singleton field ("" for anything else)
    pub fn text(&self, field: &str) -> &str {
        match self.values.get(field) {
            Some(FieldValue::Single(s)) => s,
            _ => "",
        }
    }

    /// Set the text of a singleton field
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<(), FieldError> {
        match self.values.get_mut(field) {
            Some(FieldValue::Single(s)) => {
                *s = value.into();
                Ok(())
            }
            Some(_) => Err(FieldError::KindMismatch {
                field: field.to_string(),
                expected: "text field",
            }),
            None => Err(FieldError::UnknownField(field.to_string())),
        }
    }

    /// Mutable text of a singleton field or an enabled "other" input
    pub fn text_mut(&mut self, id: &str) -> Result<&mut String, FieldError> {
        if self.values.contains_key(id) {
            return match self.values.get_mut(id) {
                Some(FieldValue::Single(s)) => Ok(s),
                _ => Err(FieldError::KindMismatch {
                    field: id.to_string(),
                    expected: "text field",
                }),
            };
        }
        let group = self
            .links
            .get(id)
            .ok_or_else(|| FieldError::UnknownField(id.to_string()))?;
        self.values
            .get_mut(group)
            .and_then(FieldValue::other_mut)
            .ok_or_else(|| FieldError::OtherDisabled(id.to_string()))
    }

    /// Selected choice of a radio group
    pub fn radio_choice(&self, group: &str) -> Option<&Choice> {
        match self.values.get(group) {
            Some(FieldValue::Radio(choice)) => choice.as_ref(),
            _ => None,
        }
    }

    /// Raw value of the selected radio
    pub fn radio_value(&self, group: &str) -> Option<&str> {
        self.radio_choice(group).map(Choice::value)
    }

    fn radio_mut(&mut self, group: &str) -> Result<&mut Option<Choice>, FieldError> {
        match self.values.get_mut(group) {
            Some(FieldValue::Radio(choice)) => Ok(choice),
            Some(_) => Err(FieldError::KindMismatch {
                field: group.to_string(),
                expected: "radio group",
            }),
            None => Err(FieldError::UnknownField(group.to_string())),
        }
    }

    fn checkboxes_mut(&mut self, group: &str) -> Result<&mut Vec<Choice>, FieldError> {
        match self.values.get_mut(group) {
            Some(FieldValue::Checkboxes(members)) => Ok(members),
            Some(_) => Err(FieldError::KindMismatch {
                field: group.to_string(),
                expected: "checkbox group",
            }),
            None => Err(FieldError::UnknownField(group.to_string())),
        }
    }

    /// Select a radio value. Moving off `other` disables and clears its text.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, group: &str, value: &str) -> Result<bool, FieldError> {
        let slot = self.radio_mut(group)?;
        if slot.as_ref().map(Choice::value) == Some(value) {
            return Ok(false);
        }
        *slot = Some(Choice::new(value));
        Ok(true)
    }

    /// Reset a field to its empty value
    pub fn clear(&mut self, field: &str) -> Result<(), FieldError> {
        let kind = schema::field(field)
            .map(|f| f.kind)
            .ok_or_else(|| FieldError::UnknownField(field.to_string()))?;
        self.values
            .insert(field.to_string(), FieldValue::empty_for(kind));
        Ok(())
    }

    pub fn is_checked(&self, group: &str, value: &str) -> bool {
        match self.values.get(group) {
            Some(FieldValue::Checkboxes(members)) => members.iter().any(|c| c.value() == value),
            Some(FieldValue::Radio(Some(choice))) => choice.value() == value,
            _ => false,
        }
    }

    /// Check or uncheck a checkbox. Members stay in display order.
    ///
    /// Returns whether the group changed.
    pub fn set_checked(&mut self, group: &str, value: &str, checked: bool) -> Result<bool, FieldError> {
        let spec = schema::field(group);
        let rank = |v: &str| {
            spec.and_then(|f| f.option_position(v))
                .unwrap_or(usize::MAX)
        };
        let members = self.checkboxes_mut(group)?;
        let existing = members.iter().position(|c| c.value() == value);

        match (existing, checked) {
            (Some(_), true) | (None, false) => Ok(false),
            (Some(index), false) => {
                members.remove(index);
                Ok(true)
            }
            (None, true) => {
                let new_rank = rank(value);
                let at = members
                    .iter()
                    .position(|c| rank(c.value()) > new_rank)
                    .unwrap_or(members.len());
                members.insert(at, Choice::new(value));
                Ok(true)
            }
        }
    }

    /// Flip a checkbox, returning its new checked state
    pub fn toggle(&mut self, group: &str, value: &str) -> Result<bool, FieldError> {
        let checked = !self.is_checked(group, value);
        self.set_checked(group, value, checked)?;
        Ok(checked)
    }

    /// Raw values currently selected in a group, in display order
    pub fn group_values(&self, group: &str) -> Vec<&str> {
        match self.values.get(group) {
            Some(FieldValue::Checkboxes(members)) => members.iter().map(Choice::value).collect(),
            Some(FieldValue::Radio(Some(choice))) => vec![choice.value()],
            _ => Vec::new(),
        }
    }

    /// Text of an "other" input, or `None` while it is disabled
    pub fn other_text(&self, other_id: &str) -> Option<&str> {
        let group = self.links.get(other_id)?;
        self.values
            .get(group)
            .and_then(FieldValue::other)
            .map(String::as_str)
    }

    pub fn is_other_enabled(&self, other_id: &str) -> bool {
        self.other_text(other_id).is_some()
    }

    /// Set the text of an enabled "other" input
    pub fn set_other_text(&mut self, other_id: &str, text: impl Into<String>) -> Result<(), FieldError> {
        if !self.links.contains_key(other_id) {
            return Err(FieldError::UnknownField(other_id.to_string()));
        }
        *self.text_mut(other_id)? = text.into();
        Ok(())
    }

    /// Enabled "other" inputs as `(id, text)` pairs
    pub fn enabled_others(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links
            .keys()
            .filter_map(|other_id| Some((other_id.as_str(), self.other_text(other_id)?)))
    }

    /// Uncheck every checkbox group and clear every "other" text
    pub fn clear_choices(&mut self) {
        for value in self.values.values_mut() {
            match value {
                FieldValue::Checkboxes(members) => members.clear(),
                FieldValue::Radio(Some(Choice::Other(text))) => text.clear(),
                _ => {}
            }
        }
    }
}
