//! Application state and core logic

use crate::api::{ApiError, BookingApi, Place, SubmitReceipt};
use crate::config::BookingConfig;
use crate::state::{
    assemble, AppState, Autocomplete, ConfirmClose, FieldKind, PlaceQuery, Step, StepItem,
    SubmitOutcome, View,
};
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Fast redraw while a search is pending or a request is running
const BUSY_POLL: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Results reported back from network tasks
#[derive(Debug)]
pub enum ApiEvent {
    Places {
        seq: u64,
        result: Result<Vec<Place>, ApiError>,
    },
    Submitted(Result<SubmitReceipt, ApiError>),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    config: BookingConfig,
    api: Arc<dyn BookingApi>,
    events_tx: UnboundedSender<ApiEvent>,
    events_rx: UnboundedReceiver<ApiEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: BookingConfig, api: Arc<dyn BookingApi>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let autocomplete = Autocomplete::new(config.debounce(), config.min_query_len);

        Self {
            state: AppState::new(autocomplete),
            config,
            api,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// How long the event loop may block waiting for input
    pub fn poll_interval(&self) -> Duration {
        if self.state.autocomplete.deadline().is_some() || self.state.submission.is_loading() {
            BUSY_POLL
        } else {
            IDLE_POLL
        }
    }

    /// Drain finished network work and fire a due place search
    pub fn tick(&mut self, now: Instant) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_api_event(event);
        }
        if let Some(query) = self.state.autocomplete.poll_due(now) {
            self.spawn_place_search(query);
        }
    }

    fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Places { seq, result } => {
                self.state.autocomplete.apply(seq, result);
            }
            ApiEvent::Submitted(result) => {
                match self
                    .state
                    .submission
                    .finish(result, &self.config.redirect_url)
                {
                    Some(SubmitOutcome::Redirect(url)) => {
                        self.state.redirect_url = Some(url);
                        self.state.current_view = View::Complete;
                    }
                    Some(SubmitOutcome::Failed(message)) => {
                        self.push_error(format!("Error submitting form: {message}"));
                    }
                    None => {}
                }
            }
        }
    }

    fn spawn_place_search(&self, query: PlaceQuery) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.search_places(&query.text).await;
            // Receiver only goes away on shutdown
            let _ = tx.send(ApiEvent::Places {
                seq: query.seq,
                result,
            });
        });
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        // Handle close confirmation (modal)
        if self.state.confirm_close.is_some() {
            self.handle_confirm_close_key(key);
            return;
        }

        match self.state.current_view {
            View::Landing => self.handle_landing_key(key),
            View::Wizard => self.handle_wizard_key(key),
            View::Complete => self.handle_complete_key(key),
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) {
        let open = self.state.autocomplete.is_open();

        match key.code {
            KeyCode::Down if open => self.state.autocomplete.select_next(),
            KeyCode::Up if open => self.state.autocomplete.select_prev(),
            KeyCode::Enter | KeyCode::Tab if open => match self.state.autocomplete.take_selected() {
                Some(place) => self.state.location_input = place,
                None if key.code == KeyCode::Enter => {
                    self.state.autocomplete.dismiss();
                    self.open_wizard();
                }
                None => {}
            },
            KeyCode::Enter => self.open_wizard(),
            KeyCode::Esc if open => self.state.autocomplete.dismiss(),
            KeyCode::Esc => self.quit = true,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.location_input.push(c);
                self.location_changed();
            }
            KeyCode::Backspace => {
                self.state.location_input.pop();
                self.location_changed();
            }
            _ => {}
        }
    }

    fn location_changed(&mut self) {
        self.state
            .autocomplete
            .on_input(&self.state.location_input, Instant::now());
    }

    /// Leave the landing view and start the wizard
    pub fn open_wizard(&mut self) {
        let location = self.state.location_input.trim();
        if location.is_empty() {
            self.push_error("Please enter a location");
            return;
        }
        tracing::info!(location, "opening booking wizard");
        self.state.wizard.open(location);
        self.state.autocomplete.reset();
        self.state.active_item = 0;
        self.state.current_view = View::Wizard;
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) {
        let active = self.state.active();
        let text_id = active.and_then(|item| item.text_id());

        match key.code {
            KeyCode::Esc => self.state.confirm_close = Some(ConfirmClose::default()),
            KeyCode::Enter | KeyCode::PageDown => {
                if self.state.wizard.step() == Step::Final {
                    self.request_submit();
                } else {
                    self.next_step();
                }
            }
            KeyCode::PageUp => self.prev_step(),
            KeyCode::Tab | KeyCode::Down => self.state.next_item(),
            KeyCode::BackTab | KeyCode::Up => self.state.prev_item(),
            KeyCode::Char(' ') if text_id.is_none() => {
                if let Some(item) = active {
                    self.activate(item);
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(id) = text_id {
                    self.edit_text(id, |text| text.push(c));
                }
            }
            KeyCode::Backspace => {
                if let Some(id) = text_id {
                    self.edit_text(id, |text| {
                        text.pop();
                    });
                }
            }
            _ => {}
        }
    }

    fn edit_text(&mut self, id: &str, edit: impl FnOnce(&mut String)) {
        match self.state.wizard.fields_mut().text_mut(id) {
            Ok(text) => edit(text),
            Err(e) => tracing::warn!("cannot edit {id}: {e}"),
        }
    }

    /// Select or toggle the focused choice
    fn activate(&mut self, item: StepItem) {
        let StepItem::Choice { spec, option } = item else {
            return;
        };

        let result = match spec.kind {
            FieldKind::Radio => self.state.wizard.select(spec.id, option.value).map(|_| true),
            FieldKind::CheckboxGroup => self.state.wizard.fields_mut().toggle(spec.id, option.value),
            _ => return,
        };

        match result {
            // Jump straight into the text box the "other" choice just enabled
            Ok(true) if option.is_other() => {
                self.state.focus_where(
                    |row| matches!(row, StepItem::Other { spec: s, .. } if s.id == spec.id),
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("failed to update {}: {e}", spec.id);
                self.push_error(e.to_string());
            }
        }
    }

    /// Validate the current step and move forward
    pub fn next_step(&mut self) {
        match self.state.wizard.advance(today()) {
            Ok(_) => self.state.active_item = 0,
            Err(e) => {
                tracing::debug!(field = e.field, "step rejected: {e}");
                self.push_error(e.to_string());
            }
        }
    }

    pub fn prev_step(&mut self) {
        self.state.wizard.retreat();
        self.state.active_item = 0;
    }

    /// Send the booking, unless a submission is already running
    pub fn request_submit(&mut self) {
        if !self.state.submission.try_begin() {
            return;
        }

        let payload = assemble(self.state.wizard.fields(), &self.config.access_key);
        tracing::debug!(fields = payload.field_count(), ?payload, "submitting booking");

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.submit(&payload).await;
            let _ = tx.send(ApiEvent::Submitted(result));
        });
    }

    fn handle_confirm_close_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.state.confirm_close.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                confirm.toggle();
            }
            KeyCode::Enter => {
                if confirm.selected_option {
                    tracing::info!("booking wizard closed");
                    self.state.reset();
                } else {
                    self.state.confirm_close = None;
                }
            }
            KeyCode::Esc => self.state.confirm_close = None,
            _ => {}
        }
    }

    fn handle_complete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.reset(),
            KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBookingApi;
    use crate::state::schema::{
        APPROXIMATE_DATE, DATE_SET, EVENT_TYPE, EVENT_TYPE_OTHER, GUEST_AGES, GUEST_COUNT,
        LANGUAGES, MUSIC_TYPES, OTHER, SERVICE_TYPES, USER_EMAIL, USER_PHONE, VENUE_TYPE,
    };
    use crate::state::ACCESS_KEY_FIELD;

    const REDIRECT: &str = "https://example.test/matches/";

    fn config() -> BookingConfig {
        BookingConfig {
            access_key: "test-key".to_string(),
            redirect_url: REDIRECT.to_string(),
            ..BookingConfig::default()
        }
    }

    fn app_with(api: MockBookingApi) -> App {
        App::new(config(), Arc::new(api))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Wait for one network task to report back and apply it
    async fn settle(app: &mut App) {
        let event = app.events_rx.recv().await.unwrap();
        app.handle_api_event(event);
    }

    /// Walk a birthday booking through every step to the final review
    fn fill_to_final(app: &mut App) {
        type_str(app, "Pune");
        press(app, KeyCode::Enter);

        let wizard = &mut app.state.wizard;
        wizard.select(EVENT_TYPE, "birthday_adult").unwrap();
        wizard.advance(today()).unwrap();
        wizard.fields_mut().toggle(GUEST_AGES, "26-40").unwrap();
        wizard.advance(today()).unwrap();
        wizard.select(GUEST_COUNT, "50_100").unwrap();
        wizard.advance(today()).unwrap();
        wizard.fields_mut().toggle(SERVICE_TYPES, "dj").unwrap();
        wizard.advance(today()).unwrap();
        wizard.fields_mut().toggle(MUSIC_TYPES, "retro").unwrap();
        wizard.advance(today()).unwrap();
        wizard.fields_mut().toggle(LANGUAGES, "english").unwrap();
        wizard.advance(today()).unwrap();
        wizard.select(VENUE_TYPE, "club").unwrap();
        wizard.advance(today()).unwrap();
        wizard.select(DATE_SET, "no").unwrap();
        wizard.select(APPROXIMATE_DATE, "within_month").unwrap();
        wizard.advance(today()).unwrap();
        let fields = wizard.fields_mut();
        fields.set_value(USER_EMAIL, "host@example.com").unwrap();
        fields.set_value(USER_PHONE, "9876543210").unwrap();
        wizard.advance(today()).unwrap();

        assert_eq!(app.state.wizard.step(), Step::Final);
    }

    mod landing {
        use super::*;

        #[test]
        fn test_empty_location_is_refused() {
            let mut app = app_with(MockBookingApi::new());
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.state.current_view, View::Landing);
            assert_eq!(app.state.current_error(), Some("Please enter a location"));
        }

        #[test]
        fn test_enter_opens_wizard_on_event_type() {
            let mut app = app_with(MockBookingApi::new());
            type_str(&mut app, "Goa");
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.state.wizard.step(), Step::EventType);
            assert_eq!(app.state.wizard.fields().text("location"), "Goa");
        }

        #[test]
        fn test_esc_quits_from_landing() {
            let mut app = app_with(MockBookingApi::new());
            press(&mut app, KeyCode::Esc);
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn test_suggestions_fill_location() {
            let mut api = MockBookingApi::new();
            api.expect_search_places()
                .withf(|query| query == "Mumbai")
                .times(1)
                .returning(|_| {
                    Ok(vec![Place {
                        display_name: "Mumbai, Maharashtra, India".to_string(),
                    }])
                });
            let mut app = app_with(api);

            type_str(&mut app, "Mumbai");
            assert_eq!(app.poll_interval(), BUSY_POLL);
            app.tick(Instant::now() + Duration::from_secs(1));
            settle(&mut app).await;

            assert!(app.state.autocomplete.is_open());
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.location_input, "Mumbai, Maharashtra, India");
            assert_eq!(app.state.current_view, View::Landing);
        }

        #[tokio::test]
        async fn test_enter_with_no_results_opens_wizard() {
            let mut api = MockBookingApi::new();
            api.expect_search_places()
                .times(1)
                .returning(|_| Ok(Vec::new()));
            let mut app = app_with(api);

            type_str(&mut app, "Nowhereville");
            app.tick(Instant::now() + Duration::from_secs(1));
            settle(&mut app).await;
            assert!(app.state.autocomplete.is_open());

            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.state.wizard.fields().text("location"), "Nowhereville");
        }

        #[test]
        fn test_no_search_before_quiet_period() {
            let mut api = MockBookingApi::new();
            api.expect_search_places().times(0);
            let mut app = app_with(api);

            type_str(&mut app, "Delhi");
            app.tick(Instant::now());
            assert!(app.state.autocomplete.deadline().is_some());
        }
    }

    mod wizard {
        use super::*;

        fn opened() -> App {
            let mut app = app_with(MockBookingApi::new());
            type_str(&mut app, "Pune");
            press(&mut app, KeyCode::Enter);
            app
        }

        #[test]
        fn test_enter_without_choice_shows_alert() {
            let mut app = opened();
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.state.wizard.step(), Step::EventType);
            assert_eq!(app.state.current_error(), Some("Please select an event type"));

            press(&mut app, KeyCode::Enter);
            assert!(!app.state.has_errors());
        }

        #[test]
        fn test_space_selects_and_enter_advances() {
            let mut app = opened();
            press(&mut app, KeyCode::Char(' '));
            assert_eq!(app.state.wizard.fields().radio_value(EVENT_TYPE), Some("wedding"));

            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.wizard.step(), Step::WeddingEvents);
            assert_eq!(app.state.active_item, 0);
        }

        #[test]
        fn test_selecting_other_focuses_its_text() {
            let mut app = opened();
            app.state.focus_where(
                |row| matches!(row, StepItem::Choice { option, .. } if option.value == OTHER),
            );
            press(&mut app, KeyCode::Char(' '));
            type_str(&mut app, "Baby shower");

            assert_eq!(
                app.state.wizard.fields().other_text(EVENT_TYPE_OTHER),
                Some("Baby shower")
            );
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.wizard.step(), Step::GuestAges);
        }

        #[test]
        fn test_page_up_goes_back_without_validation() {
            let mut app = opened();
            press(&mut app, KeyCode::PageUp);
            assert_eq!(app.state.wizard.step(), Step::Location);
        }

        #[test]
        fn test_esc_then_confirm_resets() {
            let mut app = opened();
            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Esc);
            assert!(app.state.confirm_close.is_some());

            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Enter);

            assert_eq!(app.state.current_view, View::Landing);
            assert_eq!(app.state.wizard.fields().radio_value(EVENT_TYPE), None);
        }

        #[test]
        fn test_esc_then_cancel_keeps_answers() {
            let mut app = opened();
            press(&mut app, KeyCode::Char(' '));
            press(&mut app, KeyCode::Esc);
            press(&mut app, KeyCode::Enter);

            assert!(app.state.confirm_close.is_none());
            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.state.wizard.fields().radio_value(EVENT_TYPE), Some("wedding"));
        }
    }

    mod submit {
        use super::*;

        #[tokio::test]
        async fn test_successful_submit_shows_confirmation() {
            let mut api = MockBookingApi::new();
            api.expect_submit()
                .withf(|payload| {
                    payload.get(ACCESS_KEY_FIELD) == Some("test-key")
                        && payload.get("guest_ages") == Some("26-40")
                })
                .times(1)
                .returning(|_| Ok(SubmitReceipt::default()));
            let mut app = app_with(api);
            fill_to_final(&mut app);

            press(&mut app, KeyCode::Enter);
            assert!(app.state.submission.is_loading());
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::Complete);
            assert_eq!(app.state.redirect_url.as_deref(), Some(REDIRECT));
        }

        #[tokio::test]
        async fn test_double_submit_sends_once() {
            let mut api = MockBookingApi::new();
            api.expect_submit()
                .times(1)
                .returning(|_| Ok(SubmitReceipt::default()));
            let mut app = app_with(api);
            fill_to_final(&mut app);

            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Enter);
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::Complete);
            assert!(app.events_rx.try_recv().is_err());
        }

        #[tokio::test]
        async fn test_failed_submit_keeps_answers_and_allows_retry() {
            let mut api = MockBookingApi::new();
            let mut seq = mockall::Sequence::new();
            api.expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| {
                    Err(ApiError::Rejected {
                        status: 400,
                        message: "Invalid access key".to_string(),
                    })
                });
            api.expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(SubmitReceipt::default()));
            let mut app = app_with(api);
            fill_to_final(&mut app);

            press(&mut app, KeyCode::Enter);
            settle(&mut app).await;

            assert_eq!(
                app.state.current_error(),
                Some("Error submitting form: Invalid access key")
            );
            assert!(!app.state.submission.is_loading());
            assert_eq!(app.state.wizard.step(), Step::Final);
            assert_eq!(app.state.wizard.fields().text(USER_EMAIL), "host@example.com");

            press(&mut app, KeyCode::Enter);
            press(&mut app, KeyCode::Enter);
            settle(&mut app).await;
            assert_eq!(app.state.current_view, View::Complete);
        }

        fn close_wizard(app: &mut App) {
            press(app, KeyCode::Esc);
            press(app, KeyCode::Down);
            press(app, KeyCode::Enter);
        }

        #[tokio::test]
        async fn test_close_during_submit_blocks_second_submit() {
            let mut api = MockBookingApi::new();
            api.expect_submit()
                .times(1)
                .returning(|_| Ok(SubmitReceipt::default()));
            let mut app = app_with(api);
            fill_to_final(&mut app);

            press(&mut app, KeyCode::Enter);
            close_wizard(&mut app);
            assert_eq!(app.state.current_view, View::Landing);
            assert!(app.state.submission.is_outstanding());

            fill_to_final(&mut app);
            press(&mut app, KeyCode::Enter);
            assert!(app.events_rx.try_recv().is_err());

            settle(&mut app).await;
            assert_eq!(app.state.current_view, View::Wizard);
            assert_eq!(app.state.wizard.step(), Step::Final);
            assert!(!app.state.submission.is_loading());
        }

        #[tokio::test]
        async fn test_reply_after_close_does_not_hijack_new_booking() {
            let mut api = MockBookingApi::new();
            api.expect_submit()
                .times(1)
                .returning(|_| Ok(SubmitReceipt::default()));
            let mut app = app_with(api);
            fill_to_final(&mut app);

            press(&mut app, KeyCode::Enter);
            close_wizard(&mut app);
            type_str(&mut app, "Go");
            settle(&mut app).await;

            assert_eq!(app.state.current_view, View::Landing);
            assert_eq!(app.state.location_input, "Go");
            assert!(app.state.redirect_url.is_none());
            assert!(!app.state.submission.is_loading());
        }

        #[test]
        fn test_complete_view_keys() {
            let mut app = app_with(MockBookingApi::new());
            app.state.current_view = View::Complete;
            press(&mut app, KeyCode::Enter);
            assert_eq!(app.state.current_view, View::Landing);

            app.state.current_view = View::Complete;
            press(&mut app, KeyCode::Char('q'));
            assert!(app.should_quit());
        }
    }
}
