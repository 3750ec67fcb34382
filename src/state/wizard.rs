//! Booking wizard state machine
//!
//! The wizard walks steps 1 to 10 and ends on a final review step. Step 3 has
//! two views: weddings first pick the wedding events and then the guest ages,
//! every other event type goes straight to the guest ages. Both views share
//! step index 3, which drives validation and the progress bar.

use super::forms::schema::{
    self, ChoiceOption, FieldSpec, APPROXIMATE_DATE, DATE_SET, EVENT_DATE, EVENT_TYPE,
    GUEST_AGES, GUEST_COUNT, LANGUAGES, LOCATION, MUSIC_TYPES, SERVICE_TYPES, USER_EMAIL,
    USER_NAME, USER_PHONE, VENUE_TYPE, WEDDING_EVENTS,
};
use super::forms::{validate, AgeAudience, EventTypeBranch, FieldError, FieldRegistry, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of numbered steps
pub const TOTAL_STEPS: u8 = 10;

/// Numbered steps plus the final review
const TOTAL_POSITIONS: u8 = TOTAL_STEPS + 1;

/// A wizard screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Location,
    EventType,
    WeddingEvents,
    GuestAges,
    GuestCount,
    ServiceTypes,
    MusicTypes,
    Languages,
    Venue,
    EventDate,
    Contact,
    Final,
}

impl Step {
    /// Logical step number (both step-3 views share index 3, final is 11)
    pub fn index(self) -> u8 {
        match self {
            Step::Location => 1,
            Step::EventType => 2,
            Step::WeddingEvents | Step::GuestAges => 3,
            Step::GuestCount => 4,
            Step::ServiceTypes => 5,
            Step::MusicTypes => 6,
            Step::Languages => 7,
            Step::Venue => 8,
            Step::EventDate => 9,
            Step::Contact => 10,
            Step::Final => 11,
        }
    }

    /// The view shown when arriving at `index` going forward
    fn entering(index: u8, branch: EventTypeBranch) -> Self {
        match index {
            0 | 1 => Step::Location,
            2 => Step::EventType,
            3 => match branch {
                EventTypeBranch::Wedding => Step::WeddingEvents,
                EventTypeBranch::Standard => Step::GuestAges,
            },
            4 => Step::GuestCount,
            5 => Step::ServiceTypes,
            6 => Step::MusicTypes,
            7 => Step::Languages,
            8 => Step::Venue,
            9 => Step::EventDate,
            10 => Step::Contact,
            _ => Step::Final,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Location => "Where is the event?",
            Step::EventType => "Event type",
            Step::WeddingEvents => "Wedding events",
            Step::GuestAges => "Guest ages",
            Step::GuestCount => "Guest count",
            Step::ServiceTypes => "DJ services",
            Step::MusicTypes => "Music",
            Step::Languages => "Languages",
            Step::Venue => "Venue",
            Step::EventDate => "Event date",
            Step::Contact => "Contact details",
            Step::Final => "Review and submit",
        }
    }

    /// Schema fields shown on this step, in display order
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Step::Location => &[LOCATION],
            Step::EventType => &[EVENT_TYPE],
            Step::WeddingEvents => &[WEDDING_EVENTS],
            Step::GuestAges => &[GUEST_AGES],
            Step::GuestCount => &[GUEST_COUNT],
            Step::ServiceTypes => &[SERVICE_TYPES],
            Step::MusicTypes => &[MUSIC_TYPES],
            Step::Languages => &[LANGUAGES],
            Step::Venue => &[VENUE_TYPE],
            Step::EventDate => &[DATE_SET, EVENT_DATE, APPROXIMATE_DATE],
            Step::Contact => &[USER_NAME, USER_EMAIL, USER_PHONE],
            Step::Final => &[],
        }
    }
}

/// One focusable row of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepItem {
    /// A radio button or checkbox
    Choice {
        spec: &'static FieldSpec,
        option: &'static ChoiceOption,
    },
    /// Free-text input of an enabled "other" choice
    Other {
        spec: &'static FieldSpec,
        id: &'static str,
    },
    /// A typed text field
    Text(&'static FieldSpec),
}

impl StepItem {
    /// The field this row belongs to
    pub fn spec(&self) -> &'static FieldSpec {
        match self {
            StepItem::Choice { spec, .. } | StepItem::Other { spec, .. } => *spec,
            StepItem::Text(spec) => *spec,
        }
    }

    /// Id of the text this row edits, if it is a text row
    pub fn text_id(&self) -> Option<&'static str> {
        match self {
            StepItem::Choice { .. } => None,
            StepItem::Other { id, .. } => Some(*id),
            StepItem::Text(spec) => Some(spec.id),
        }
    }
}

/// Current step and every field value of the wizard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    step: Step,
    fields: FieldRegistry,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    /// Direct field access for text and checkbox edits. Radio selections go
    /// through [`WizardState::select`] so dependent fields stay consistent.
    pub fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    pub fn branch(&self) -> EventTypeBranch {
        EventTypeBranch::from_event_type(self.fields.radio_value(EVENT_TYPE))
    }

    pub fn audience(&self) -> AgeAudience {
        AgeAudience::from_event_type(self.fields.radio_value(EVENT_TYPE))
    }

    /// Start the wizard from the landing screen with the chosen location
    pub fn open(&mut self, location: &str) {
        if let Ok(current) = self.fields.text_mut(LOCATION) {
            *current = location.to_string();
        }
        self.step = Step::EventType;
    }

    /// Validate the current step and move forward
    ///
    /// On the wedding events view this switches to the guest ages view
    /// without changing the step index.
    pub fn advance(&mut self, today: NaiveDate) -> Result<Step, ValidationError> {
        validate(self.step.index(), &self.fields, today)?;

        let next = match self.step {
            Step::WeddingEvents => Step::GuestAges,
            Step::Contact | Step::Final => Step::Final,
            step => Step::entering(step.index() + 1, self.branch()),
        };
        tracing::debug!(from = ?self.step, to = ?next, "wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Move back one view. Never validated.
    pub fn retreat(&mut self) -> Step {
        let prev = match self.step {
            Step::Location => Step::Location,
            Step::GuestAges if self.branch() == EventTypeBranch::Wedding => Step::WeddingEvents,
            Step::GuestCount => Step::GuestAges,
            Step::Final => Step::Contact,
            step => Step::entering(step.index() - 1, self.branch()),
        };
        tracing::debug!(from = ?self.step, to = ?prev, "wizard retreated");
        self.step = prev;
        prev
    }

    /// Fraction of the wizard completed, 0.0 on step 1 and 1.0 on the final step
    pub fn progress(&self) -> f64 {
        f64::from(self.step.index() - 1) / f64::from(TOTAL_POSITIONS - 1)
    }

    /// Indicator text, counted from the event-type step so the final review
    /// reads `Step 10 of 10`
    pub fn step_label(&self) -> String {
        format!(
            "Step {} of {}",
            self.step.index() - 1,
            TOTAL_POSITIONS - 1
        )
    }

    /// Select a radio value, applying the side effects some groups carry
    pub fn select(&mut self, group: &str, value: &str) -> Result<bool, FieldError> {
        match group {
            EVENT_TYPE => self.select_event_type(value),
            DATE_SET => self.select_date_set(value),
            _ => self.fields.select(group, value),
        }
    }

    /// Change the event type
    ///
    /// A new event type clears every checkbox and every "other" text, and
    /// re-derives which step-3 view is shown.
    pub fn select_event_type(&mut self, value: &str) -> Result<bool, FieldError> {
        if self.fields.radio_value(EVENT_TYPE) == Some(value) {
            return Ok(false);
        }
        self.fields.clear_choices();
        self.fields.select(EVENT_TYPE, value)?;
        if self.step.index() == 3 {
            self.step = Step::entering(3, self.branch());
        }
        Ok(true)
    }

    /// Answer "have you set a date"; each answer clears the other answer's inputs
    pub fn select_date_set(&mut self, value: &str) -> Result<bool, FieldError> {
        let changed = self.fields.select(DATE_SET, value)?;
        if changed {
            if value == "yes" {
                self.fields.clear(APPROXIMATE_DATE)?;
            } else {
                self.fields.clear(EVENT_DATE)?;
            }
        }
        Ok(changed)
    }

    /// Back to a blank wizard on step 1
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn is_visible(&self, field: &str) -> bool {
        match field {
            EVENT_DATE => self.fields.radio_value(DATE_SET) == Some("yes"),
            APPROXIMATE_DATE => self.fields.radio_value(DATE_SET) == Some("no"),
            _ => true,
        }
    }

    /// Focusable rows of the current step
    pub fn items(&self) -> Vec<StepItem> {
        let audience = self.audience();
        let mut items = Vec::new();

        for spec in self.step.fields().iter().filter_map(|id| schema::field(id)) {
            if !self.is_visible(spec.id) {
                continue;
            }
            if !spec.kind.is_choice() {
                items.push(StepItem::Text(spec));
                continue;
            }
            for option in spec.visible_options(audience) {
                items.push(StepItem::Choice { spec, option });
                if let Some(id) = spec.other_id.filter(|_| option.is_other()) {
                    if self.fields.is_other_enabled(id) {
                        items.push(StepItem::Other { spec, id });
                    }
                }
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::schema::{EVENT_TYPE_OTHER, MUSIC_OTHER};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn at_step(step: Step) -> WizardState {
        WizardState {
            step,
            ..WizardState::new()
        }
    }

    /// Fill in valid answers for steps 4 to 10
    fn fill_remaining(wizard: &mut WizardState) {
        wizard.select(GUEST_COUNT, "50_100").unwrap();
        let fields = wizard.fields_mut();
        fields.toggle(SERVICE_TYPES, "dj").unwrap();
        fields.toggle(MUSIC_TYPES, "bollywood").unwrap();
        fields.toggle(LANGUAGES, "hindi").unwrap();
        wizard.select(VENUE_TYPE, "hotel").unwrap();
        wizard.select(DATE_SET, "no").unwrap();
        wizard.select(APPROXIMATE_DATE, "within_month").unwrap();
        let fields = wizard.fields_mut();
        fields.set_value(USER_EMAIL, "guest@example.com").unwrap();
        fields.set_value(USER_PHONE, "9876543210").unwrap();
    }

    mod steps {
        use super::*;

        #[test]
        fn test_default_is_location() {
            let wizard = WizardState::new();
            assert_eq!(wizard.step(), Step::Location);
            assert_eq!(wizard.progress(), 0.0);
        }

        #[test]
        fn test_both_step_three_views_share_index() {
            assert_eq!(Step::WeddingEvents.index(), 3);
            assert_eq!(Step::GuestAges.index(), 3);
        }

        #[test]
        fn test_progress_reaches_one_on_final() {
            assert_eq!(at_step(Step::Final).progress(), 1.0);
            assert_eq!(at_step(Step::EventType).progress(), 0.1);
            assert_eq!(at_step(Step::Contact).progress(), 0.9);
        }

        #[test]
        fn test_step_label_counts_from_event_type() {
            assert_eq!(at_step(Step::EventType).step_label(), "Step 1 of 10");
            assert_eq!(at_step(Step::Venue).step_label(), "Step 7 of 10");
            assert_eq!(at_step(Step::Final).step_label(), "Step 10 of 10");
        }

        #[test]
        fn test_open_copies_location_and_shows_event_type() {
            let mut wizard = WizardState::new();
            wizard.open("Koregaon Park, Pune");
            assert_eq!(wizard.step(), Step::EventType);
            assert_eq!(wizard.fields().text(LOCATION), "Koregaon Park, Pune");
        }
    }

    mod advance {
        use super::*;

        #[test]
        fn test_failure_stays_put() {
            let mut wizard = at_step(Step::EventType);
            let err = wizard.advance(today()).unwrap_err();
            assert_eq!(err.message, "Please select an event type");
            assert_eq!(wizard.step(), Step::EventType);
        }

        #[test]
        fn test_location_step_always_passes() {
            let mut wizard = WizardState::new();
            assert_eq!(wizard.advance(today()), Ok(Step::EventType));
        }

        #[test]
        fn test_final_is_terminal() {
            let mut wizard = at_step(Step::Final);
            assert_eq!(wizard.advance(today()), Ok(Step::Final));
        }

        #[test]
        fn test_standard_flow_reaches_final() {
            let mut wizard = WizardState::new();
            wizard.open("Pune");
            wizard.select(EVENT_TYPE, "birthday_adult").unwrap();
            assert_eq!(wizard.advance(today()), Ok(Step::GuestAges));

            let ages: Vec<_> = wizard
                .items()
                .iter()
                .filter_map(|item| match item {
                    StepItem::Choice { option, .. } => Some(option.value),
                    _ => None,
                })
                .collect();
            assert_eq!(ages, vec!["18-25", "26-40", "41-60", "60+"]);

            wizard.fields_mut().toggle(GUEST_AGES, "26-40").unwrap();
            assert_eq!(wizard.advance(today()), Ok(Step::GuestCount));

            fill_remaining(&mut wizard);
            for _ in 4..=9 {
                wizard.advance(today()).unwrap();
            }
            assert_eq!(wizard.step(), Step::Contact);
            assert_eq!(wizard.advance(today()), Ok(Step::Final));
            assert_eq!(wizard.progress(), 1.0);
        }

        #[test]
        fn test_wedding_flow_switches_view_in_place() {
            let mut wizard = WizardState::new();
            wizard.open("Udaipur");
            wizard.select(EVENT_TYPE, "wedding").unwrap();
            assert_eq!(wizard.advance(today()), Ok(Step::WeddingEvents));

            wizard.fields_mut().toggle(WEDDING_EVENTS, "sangeet").unwrap();
            assert_eq!(wizard.advance(today()), Ok(Step::GuestAges));
            assert_eq!(wizard.step().index(), 3);

            assert_eq!(wizard.retreat(), Step::WeddingEvents);
            assert_eq!(wizard.step().index(), 3);
        }

        #[test]
        fn test_wedding_age_view_validates_wedding_events() {
            let mut wizard = WizardState::new();
            wizard.select(EVENT_TYPE, "wedding").unwrap();
            wizard.fields_mut().toggle(WEDDING_EVENTS, "haldi").unwrap();
            wizard.step = Step::GuestAges;
            assert_eq!(wizard.advance(today()), Ok(Step::GuestCount));
        }

        #[test]
        fn test_child_birthday_lists_child_ages() {
            let mut wizard = WizardState::new();
            wizard.select(EVENT_TYPE, "birthday_child").unwrap();
            wizard.step = Step::GuestAges;
            let values: Vec<_> = wizard
                .items()
                .iter()
                .filter_map(|item| match item {
                    StepItem::Choice { option, .. } => Some(option.value),
                    _ => None,
                })
                .collect();
            assert_eq!(values, vec!["0-5", "6-12", "13-17"]);
        }
    }

    mod retreat {
        use super::*;

        #[test]
        fn test_location_stays() {
            let mut wizard = WizardState::new();
            assert_eq!(wizard.retreat(), Step::Location);
        }

        #[test]
        fn test_decrements_index() {
            let mut wizard = at_step(Step::Languages);
            assert_eq!(wizard.retreat(), Step::MusicTypes);
        }

        #[test]
        fn test_guest_count_returns_to_age_view() {
            let mut wizard = at_step(Step::GuestCount);
            wizard.select(EVENT_TYPE, "wedding").unwrap();
            assert_eq!(wizard.retreat(), Step::GuestAges);
            assert_eq!(wizard.retreat(), Step::WeddingEvents);
            assert_eq!(wizard.retreat(), Step::EventType);
        }

        #[test]
        fn test_standard_age_view_returns_to_event_type() {
            let mut wizard = at_step(Step::GuestAges);
            wizard.select(EVENT_TYPE, "corporate").unwrap();
            assert_eq!(wizard.retreat(), Step::EventType);
        }

        #[test]
        fn test_final_returns_to_contact() {
            let mut wizard = at_step(Step::Final);
            assert_eq!(wizard.retreat(), Step::Contact);
        }

        #[test]
        fn test_retreat_skips_validation() {
            let mut wizard = at_step(Step::Contact);
            assert_eq!(wizard.retreat(), Step::EventDate);
        }
    }

    mod event_type_change {
        use super::*;

        #[test]
        fn test_change_clears_checkboxes_and_other_text() {
            let mut wizard = WizardState::new();
            wizard.select(EVENT_TYPE, "corporate").unwrap();
            let fields = wizard.fields_mut();
            fields.toggle(GUEST_AGES, "18-25").unwrap();
            fields.toggle(MUSIC_TYPES, "other").unwrap();
            fields.set_other_text(MUSIC_OTHER, "Sufi").unwrap();

            assert!(wizard.select(EVENT_TYPE, "wedding").unwrap());

            assert!(wizard.fields().group_values(GUEST_AGES).is_empty());
            assert!(!wizard.fields().is_other_enabled(MUSIC_OTHER));
        }

        #[test]
        fn test_reselecting_same_type_keeps_answers() {
            let mut wizard = WizardState::new();
            wizard.select(EVENT_TYPE, "corporate").unwrap();
            wizard.fields_mut().toggle(GUEST_AGES, "18-25").unwrap();
            assert!(!wizard.select(EVENT_TYPE, "corporate").unwrap());
            assert_eq!(wizard.fields().group_values(GUEST_AGES), vec!["18-25"]);
        }

        #[test]
        fn test_other_event_type_enables_its_text() {
            let mut wizard = WizardState::new();
            wizard.select(EVENT_TYPE, "other").unwrap();
            assert_eq!(wizard.fields().other_text(EVENT_TYPE_OTHER), Some(""));
        }

        #[test]
        fn test_change_on_step_three_rederives_view() {
            let mut wizard = at_step(Step::GuestAges);
            wizard.select(EVENT_TYPE, "wedding").unwrap();
            assert_eq!(wizard.step(), Step::WeddingEvents);
            wizard.select(EVENT_TYPE, "private_party").unwrap();
            assert_eq!(wizard.step(), Step::GuestAges);
        }
    }

    mod items {
        use super::*;

        #[test]
        fn test_other_row_follows_other_choice_when_enabled() {
            let mut wizard = at_step(Step::EventType);
            let before = wizard.items().len();
            wizard.select(EVENT_TYPE, "other").unwrap();
            let items = wizard.items();
            assert_eq!(items.len(), before + 1);
            assert_eq!(items.last().and_then(StepItem::text_id), Some(EVENT_TYPE_OTHER));
        }

        #[test]
        fn test_date_step_shows_inputs_for_answer() {
            let mut wizard = at_step(Step::EventDate);
            assert_eq!(wizard.items().len(), 2);

            wizard.select(DATE_SET, "yes").unwrap();
            assert!(wizard.items().iter().any(|i| i.text_id() == Some(EVENT_DATE)));

            wizard.select(DATE_SET, "no").unwrap();
            let items = wizard.items();
            assert!(items.iter().all(|i| i.text_id() != Some(EVENT_DATE)));
            assert!(items.iter().any(|i| matches!(
                i,
                StepItem::Choice { spec, .. } if spec.id == APPROXIMATE_DATE
            )));
        }

        #[test]
        fn test_date_answers_clear_each_other() {
            let mut wizard = at_step(Step::EventDate);
            wizard.select(DATE_SET, "yes").unwrap();
            wizard.fields_mut().set_value(EVENT_DATE, "2027-01-01").unwrap();
            wizard.select(DATE_SET, "no").unwrap();
            assert_eq!(wizard.fields().text(EVENT_DATE), "");

            wizard.select(APPROXIMATE_DATE, "within_month").unwrap();
            wizard.select(DATE_SET, "yes").unwrap();
            assert_eq!(wizard.fields().radio_value(APPROXIMATE_DATE), None);
        }

        #[test]
        fn test_contact_step_is_all_text() {
            let wizard = at_step(Step::Contact);
            let ids: Vec<_> = wizard.items().iter().filter_map(StepItem::text_id).collect();
            assert_eq!(ids, vec![USER_NAME, USER_EMAIL, USER_PHONE]);
        }

        #[test]
        fn test_final_has_no_rows() {
            assert!(at_step(Step::Final).items().is_empty());
        }
    }

    #[test]
    fn test_reset() {
        let mut wizard = WizardState::new();
        wizard.open("Pune");
        wizard.select(EVENT_TYPE, "wedding").unwrap();
        wizard.reset();
        assert_eq!(wizard, WizardState::new());
    }

    #[test]
    fn test_state_serializes() {
        let mut wizard = WizardState::new();
        wizard.open("Pune");
        let json = serde_json::to_string(&wizard).unwrap();
        let restored: WizardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, wizard);
    }
}
