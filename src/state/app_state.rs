//! Application state definitions

use super::autocomplete::Autocomplete;
use super::submission::SubmissionCoordinator;
use super::wizard::{StepItem, WizardState};
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Location search that opens the wizard
    #[default]
    Landing,
    Wizard,
    /// Shown after the relay accepted the booking
    Complete,
}

/// Pending "close the wizard?" confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfirmClose {
    /// false = keep editing, true = close and discard
    pub selected_option: bool,
}

impl ConfirmClose {
    pub fn toggle(&mut self) {
        self.selected_option = !self.selected_option;
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Landing
    pub location_input: String,
    pub autocomplete: Autocomplete,

    // Wizard
    pub wizard: WizardState,
    pub active_item: usize,
    pub submission: SubmissionCoordinator,

    // Dialogs
    pub error_queue: VecDeque<String>,
    pub confirm_close: Option<ConfirmClose>,

    // Completion
    pub redirect_url: Option<String>,
}

impl AppState {
    pub fn new(autocomplete: Autocomplete) -> Self {
        Self {
            autocomplete,
            ..Self::default()
        }
    }

    /// Queue a message for the alert dialog
    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Rows of the current wizard step
    pub fn items(&self) -> Vec<StepItem> {
        self.wizard.items()
    }

    /// The focused row, clamped to the rows currently shown
    pub fn active(&self) -> Option<StepItem> {
        let items = self.items();
        let last = items.len().checked_sub(1)?;
        items.get(self.active_item.min(last)).copied()
    }

    /// Move to next row
    pub fn next_item(&mut self) {
        let count = self.items().len();
        if count > 0 {
            self.active_item = (self.active_item.min(count - 1) + 1) % count;
        }
    }

    /// Move to previous row
    pub fn prev_item(&mut self) {
        let count = self.items().len();
        if count == 0 {
            return;
        }
        let current = self.active_item.min(count - 1);
        self.active_item = if current == 0 { count - 1 } else { current - 1 };
    }

    /// Focus the row matching a predicate, if it is shown
    pub fn focus_where(&mut self, pred: impl Fn(&StepItem) -> bool) {
        if let Some(pos) = self.items().iter().position(pred) {
            self.active_item = pos;
        }
    }

    /// Throw away everything entered and go back to the landing view
    pub fn reset(&mut self) {
        self.current_view = View::Landing;
        self.location_input.clear();
        self.autocomplete.reset();
        self.wizard.reset();
        self.active_item = 0;
        self.submission.reset();
        self.error_queue.clear();
        self.confirm_close = None;
        self.redirect_url = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::schema::{EVENT_TYPE, OTHER};
    use crate::state::Step;

    fn on_event_type() -> AppState {
        let mut state = AppState::default();
        state.current_view = View::Wizard;
        state.wizard.open("Mumbai");
        state
    }

    mod errors {
        use super::*;

        #[test]
        fn test_errors_are_shown_in_order() {
            let mut state = AppState::default();
            state.push_error("first".into());
            state.push_error("second".into());

            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(!state.has_errors());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn test_next_item_wraps() {
            let mut state = on_event_type();
            let count = state.items().len();
            assert!(count > 1);

            state.active_item = count - 1;
            state.next_item();
            assert_eq!(state.active_item, 0);
        }

        #[test]
        fn test_prev_item_wraps() {
            let mut state = on_event_type();
            state.prev_item();
            assert_eq!(state.active_item, state.items().len() - 1);
        }

        #[test]
        fn test_active_clamps_when_rows_disappear() {
            let mut state = on_event_type();
            state.active_item = 999;
            assert!(state.active().is_some());
        }

        #[test]
        fn test_focus_where_finds_other_row() {
            let mut state = on_event_type();
            state.wizard.select(EVENT_TYPE, OTHER).unwrap();
            state.focus_where(|item| matches!(item, StepItem::Other { .. }));
            assert!(matches!(state.active(), Some(StepItem::Other { .. })));
        }
    }

    #[test]
    fn test_reset_returns_to_landing() {
        let mut state = on_event_type();
        state.location_input = "Mumbai".into();
        state.confirm_close = Some(ConfirmClose::default());
        state.push_error("oops".into());

        state.reset();

        assert_eq!(state.current_view, View::Landing);
        assert!(state.location_input.is_empty());
        assert_eq!(state.wizard.step(), Step::Location);
        assert!(!state.submission.is_loading());
        assert!(state.confirm_close.is_none());
        assert!(!state.has_errors());
    }

    #[test]
    fn test_reset_keeps_outstanding_submission() {
        let mut state = on_event_type();
        state.submission.try_begin();

        state.reset();

        assert_eq!(state.current_view, View::Landing);
        assert!(state.submission.is_outstanding());
        assert!(!state.submission.try_begin());
    }

    #[test]
    fn test_confirm_toggle() {
        let mut confirm = ConfirmClose::default();
        assert!(!confirm.selected_option);
        confirm.toggle();
        assert!(confirm.selected_option);
    }
}
