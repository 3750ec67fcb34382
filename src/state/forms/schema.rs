//! Declarative schema for the booking form
//!
//! Every field the wizard knows about is listed here once: its kind, the
//! choices it offers, the free-text input linked to its "other" choice and the
//! messages shown when the field blocks a step. The field registry, the
//! validator and the payload assembler all read from this table, and field ids
//! double as payload keys.

use serde::{Deserialize, Serialize};

/// Sentinel choice value that enables a linked free-text input
pub const OTHER: &str = "other";

pub const LOCATION: &str = "location";
pub const EVENT_TYPE: &str = "event_type";
pub const EVENT_TYPE_OTHER: &str = "event_type_other";
pub const WEDDING_EVENTS: &str = "wedding_events";
pub const GUEST_AGES: &str = "guest_ages";
pub const GUEST_COUNT: &str = "guest_count";
pub const GUEST_COUNT_OTHER: &str = "guest_count_other";
pub const SERVICE_TYPES: &str = "service_types";
pub const SERVICE_OTHER: &str = "service_other";
pub const MUSIC_TYPES: &str = "music_types";
pub const MUSIC_OTHER: &str = "music_other";
pub const LANGUAGES: &str = "languages";
pub const LANGUAGE_OTHER: &str = "language_other";
pub const VENUE_TYPE: &str = "venue_type";
pub const VENUE_OTHER: &str = "venue_other";
pub const DATE_SET: &str = "date_set";
pub const EVENT_DATE: &str = "event_date";
pub const APPROXIMATE_DATE: &str = "approximate_date";
pub const DATE_OTHER: &str = "date_other";
pub const USER_NAME: &str = "user_name";
pub const USER_EMAIL: &str = "user_email";
pub const USER_PHONE: &str = "user_phone";

/// Event type value that switches step 3 to the wedding sub-flow
pub const WEDDING: &str = "wedding";
/// Event type value that switches guest ages to the children's ranges
pub const BIRTHDAY_CHILD: &str = "birthday_child";

/// How a field is entered and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD`
    Date,
    Email,
    Phone,
    Radio,
    CheckboxGroup,
}

impl FieldKind {
    /// Whether the field holds a selection rather than typed text
    pub fn is_choice(self) -> bool {
        matches!(self, FieldKind::Radio | FieldKind::CheckboxGroup)
    }
}

/// Which step-3 sub-flow the selected event type leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventTypeBranch {
    #[default]
    Standard,
    Wedding,
}

impl EventTypeBranch {
    pub fn from_event_type(event_type: Option<&str>) -> Self {
        match event_type {
            Some(WEDDING) => Self::Wedding,
            _ => Self::Standard,
        }
    }
}

/// Which guest-age ranges are offered for the selected event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgeAudience {
    #[default]
    Adult,
    Child,
}

impl AgeAudience {
    pub fn from_event_type(event_type: Option<&str>) -> Self {
        match event_type {
            Some(BIRTHDAY_CHILD) => Self::Child,
            _ => Self::Adult,
        }
    }
}

/// A selectable value of a radio or checkbox group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
    /// Restricts the option to one guest audience; `None` means always shown
    pub audience: Option<AgeAudience>,
}

impl ChoiceOption {
    pub fn is_other(&self) -> bool {
        self.value == OTHER
    }

    pub fn is_offered_to(&self, audience: AgeAudience) -> bool {
        self.audience.map_or(true, |a| a == audience)
    }
}

const fn choice(value: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption {
        value,
        label,
        audience: None,
    }
}

const fn aged(value: &'static str, label: &'static str, audience: AgeAudience) -> ChoiceOption {
    ChoiceOption {
        value,
        label,
        audience: Some(audience),
    }
}

const OTHER_CHOICE: ChoiceOption = choice(OTHER, "Other");

/// One entry of the form schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Choices in display order (empty for text fields)
    pub options: &'static [ChoiceOption],
    /// Id of the free-text input enabled by the `other` choice
    pub other_id: Option<&'static str>,
    /// Shown when the field is required and empty
    pub required_message: &'static str,
    /// Shown when `other` is chosen but its text is empty
    pub other_message: &'static str,
}

impl FieldSpec {
    /// Position of a value in display order
    pub fn option_position(&self, value: &str) -> Option<usize> {
        self.options.iter().position(|o| o.value == value)
    }

    pub fn option_label(&self, value: &str) -> Option<&'static str> {
        self.options.iter().find(|o| o.value == value).map(|o| o.label)
    }

    /// Options shown to the given audience
    pub fn visible_options(&self, audience: AgeAudience) -> impl Iterator<Item = &ChoiceOption> {
        self.options.iter().filter(move |o| o.is_offered_to(audience))
    }
}

const EVENT_TYPE_OPTIONS: &[ChoiceOption] = &[
    choice(WEDDING, "Wedding"),
    choice("birthday_adult", "Birthday (adults)"),
    choice(BIRTHDAY_CHILD, "Birthday (kids)"),
    choice("corporate", "Corporate event"),
    choice("private_party", "Private party"),
    choice("college_fest", "College fest"),
    OTHER_CHOICE,
];

const WEDDING_EVENT_OPTIONS: &[ChoiceOption] = &[
    choice("haldi", "Haldi"),
    choice("mehendi", "Mehendi"),
    choice("sangeet", "Sangeet"),
    choice("cocktail", "Cocktail night"),
    choice("baraat", "Baraat"),
    choice("reception", "Reception"),
];

const GUEST_AGE_OPTIONS: &[ChoiceOption] = &[
    aged("0-5", "Under 5", AgeAudience::Child),
    aged("6-12", "6 to 12", AgeAudience::Child),
    aged("13-17", "13 to 17", AgeAudience::Child),
    aged("18-25", "18 to 25", AgeAudience::Adult),
    aged("26-40", "26 to 40", AgeAudience::Adult),
    aged("41-60", "41 to 60", AgeAudience::Adult),
    aged("60+", "Over 60", AgeAudience::Adult),
];

const GUEST_COUNT_OPTIONS: &[ChoiceOption] = &[
    choice("under_50", "Fewer than 50"),
    choice("50_100", "50 to 100"),
    choice("100_250", "100 to 250"),
    choice("250_500", "250 to 500"),
    choice("500_plus", "More than 500"),
    OTHER_CHOICE,
];

const SERVICE_TYPE_OPTIONS: &[ChoiceOption] = &[
    choice("dj", "DJ only"),
    choice("dj_lighting", "DJ with lighting"),
    choice("sound_system", "Sound system rental"),
    choice("emcee", "MC / host"),
    choice("dhol", "Dhol player"),
    OTHER_CHOICE,
];

const MUSIC_TYPE_OPTIONS: &[ChoiceOption] = &[
    choice("bollywood", "Bollywood"),
    choice("punjabi", "Punjabi"),
    choice("rock", "Rock"),
    choice("jazz", "Jazz"),
    choice("edm", "EDM"),
    choice("hip_hop", "Hip hop"),
    choice("retro", "Retro"),
    OTHER_CHOICE,
];

const LANGUAGE_OPTIONS: &[ChoiceOption] = &[
    choice("hindi", "Hindi"),
    choice("english", "English"),
    choice("punjabi", "Punjabi"),
    choice("marathi", "Marathi"),
    choice("tamil", "Tamil"),
    choice("telugu", "Telugu"),
    OTHER_CHOICE,
];

const VENUE_TYPE_OPTIONS: &[ChoiceOption] = &[
    choice("banquet_hall", "Banquet hall"),
    choice("hotel", "Hotel"),
    choice("lawn", "Outdoor lawn"),
    choice("farmhouse", "Farmhouse"),
    choice("home", "Home"),
    choice("club", "Club / lounge"),
    OTHER_CHOICE,
];

const DATE_SET_OPTIONS: &[ChoiceOption] = &[
    choice("yes", "Yes, I have a date"),
    choice("no", "Not yet"),
];

const APPROXIMATE_DATE_OPTIONS: &[ChoiceOption] = &[
    choice("within_month", "Within a month"),
    choice("one_to_three_months", "In 1 to 3 months"),
    choice("three_to_six_months", "In 3 to 6 months"),
    choice("six_plus_months", "More than 6 months away"),
    OTHER_CHOICE,
];

const fn text(id: &'static str, label: &'static str, kind: FieldKind, required: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        label,
        kind,
        options: &[],
        other_id: None,
        required_message: required,
        other_message: "",
    }
}

/// The complete form, in display order
pub const FIELDS: &[FieldSpec] = &[
    text(LOCATION, "Event location", FieldKind::Text, "Please enter a location"),
    FieldSpec {
        id: EVENT_TYPE,
        label: "What type of event are you planning?",
        kind: FieldKind::Radio,
        options: EVENT_TYPE_OPTIONS,
        other_id: Some(EVENT_TYPE_OTHER),
        required_message: "Please select an event type",
        other_message: "Please specify the other event type",
    },
    FieldSpec {
        id: WEDDING_EVENTS,
        label: "Which wedding events need a DJ?",
        kind: FieldKind::CheckboxGroup,
        options: WEDDING_EVENT_OPTIONS,
        other_id: None,
        required_message: "Please select at least one wedding event",
        other_message: "",
    },
    FieldSpec {
        id: GUEST_AGES,
        label: "How old are most of the guests?",
        kind: FieldKind::CheckboxGroup,
        options: GUEST_AGE_OPTIONS,
        other_id: None,
        required_message: "Please select at least one age range",
        other_message: "",
    },
    FieldSpec {
        id: GUEST_COUNT,
        label: "How many guests do you expect?",
        kind: FieldKind::Radio,
        options: GUEST_COUNT_OPTIONS,
        other_id: Some(GUEST_COUNT_OTHER),
        required_message: "Please select an estimated guest count",
        other_message: "Please specify the other guest count",
    },
    FieldSpec {
        id: SERVICE_TYPES,
        label: "Which DJ services do you need?",
        kind: FieldKind::CheckboxGroup,
        options: SERVICE_TYPE_OPTIONS,
        other_id: Some(SERVICE_OTHER),
        required_message: "Please select at least one service type",
        other_message: "Please specify the other service type",
    },
    FieldSpec {
        id: MUSIC_TYPES,
        label: "What music should be played?",
        kind: FieldKind::CheckboxGroup,
        options: MUSIC_TYPE_OPTIONS,
        other_id: Some(MUSIC_OTHER),
        required_message: "Please select at least one music type",
        other_message: "Please specify the other music type",
    },
    FieldSpec {
        id: LANGUAGES,
        label: "Which languages should the DJ speak?",
        kind: FieldKind::CheckboxGroup,
        options: LANGUAGE_OPTIONS,
        other_id: Some(LANGUAGE_OTHER),
        required_message: "Please select at least one language",
        other_message: "Please specify the other language",
    },
    FieldSpec {
        id: VENUE_TYPE,
        label: "Where is the event taking place?",
        kind: FieldKind::Radio,
        options: VENUE_TYPE_OPTIONS,
        other_id: Some(VENUE_OTHER),
        required_message: "Please select a venue type",
        other_message: "Please specify the other venue type",
    },
    FieldSpec {
        id: DATE_SET,
        label: "Have you set a date?",
        kind: FieldKind::Radio,
        options: DATE_SET_OPTIONS,
        other_id: None,
        required_message: "Please indicate if you have set a date",
        other_message: "",
    },
    text(EVENT_DATE, "Event date (YYYY-MM-DD)", FieldKind::Date, "Please select a specific date"),
    FieldSpec {
        id: APPROXIMATE_DATE,
        label: "When is the event, roughly?",
        kind: FieldKind::Radio,
        options: APPROXIMATE_DATE_OPTIONS,
        other_id: Some(DATE_OTHER),
        required_message: "Please select an approximate timeframe",
        other_message: "Please specify the other timeframe",
    },
    text(USER_NAME, "Your name (optional)", FieldKind::Text, ""),
    text(USER_EMAIL, "Email address", FieldKind::Email, "Please enter your email address"),
    text(USER_PHONE, "Phone number (10 digits)", FieldKind::Phone, "Please enter your phone number"),
];

/// Look up a field by id
pub fn field(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_ids_are_unique() {
        let mut seen = HashSet::new();
        for f in FIELDS {
            assert!(seen.insert(f.id), "duplicate field id {}", f.id);
            if let Some(other) = f.other_id {
                assert!(seen.insert(other), "duplicate other id {other}");
            }
        }
    }

    #[test]
    fn test_other_links_point_at_groups_offering_other() {
        for f in FIELDS.iter().filter(|f| f.other_id.is_some()) {
            assert!(f.kind.is_choice());
            assert!(f.options.iter().any(ChoiceOption::is_other), "{}", f.id);
            assert!(!f.other_message.is_empty());
        }
    }

    #[test]
    fn test_rock_is_listed_before_jazz() {
        let music = field(MUSIC_TYPES).unwrap();
        assert!(music.option_position("rock") < music.option_position("jazz"));
    }

    #[test]
    fn test_guest_ages_filtered_by_audience() {
        let ages = field(GUEST_AGES).unwrap();
        let child: Vec<_> = ages.visible_options(AgeAudience::Child).map(|o| o.value).collect();
        let adult: Vec<_> = ages.visible_options(AgeAudience::Adult).map(|o| o.value).collect();
        assert_eq!(child, vec!["0-5", "6-12", "13-17"]);
        assert_eq!(adult, vec!["18-25", "26-40", "41-60", "60+"]);
    }

    #[test]
    fn test_branch_from_event_type() {
        assert_eq!(EventTypeBranch::from_event_type(Some(WEDDING)), EventTypeBranch::Wedding);
        assert_eq!(EventTypeBranch::from_event_type(Some("corporate")), EventTypeBranch::Standard);
        assert_eq!(EventTypeBranch::from_event_type(None), EventTypeBranch::Standard);
    }

    #[test]
    fn test_audience_from_event_type() {
        assert_eq!(AgeAudience::from_event_type(Some(BIRTHDAY_CHILD)), AgeAudience::Child);
        assert_eq!(AgeAudience::from_event_type(Some("birthday_adult")), AgeAudience::Adult);
        assert_eq!(AgeAudience::from_event_type(None), AgeAudience::Adult);
    }
}
