//! Main application logic and key handling

use crate::config::AppConfig;
use crate::notify::{NotificationQueue, Notifier};
use crate::state::{
    is_email_shaped, AddressField, AddressKind, ContactField, FieldRef, FormSession,
    ReferenceTable, SubmissionFlow, SubmitRefusal, ValidationErrors, EMAIL_BLUR_WARNING,
};
use crate::transmit::{SubmissionReceipt, Transmitter};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

type Outcome = anyhow::Result<SubmissionReceipt>;

/// Focusable element of the form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Contact(ContactField),
    SameAs(AddressKind),
    Address(AddressKind, AddressField),
    Save,
}

/// Main application state
pub struct App {
    pub session: FormSession,
    pub submission: SubmissionFlow,
    pub focus: Focus,
    pub notifications: Arc<NotificationQueue>,
    /// Inline errors are shown once a submit has been attempted
    submit_attempted: bool,
    transmitter: Arc<dyn Transmitter>,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
    quit: bool,
}

impl App {
    pub fn new(
        config: &AppConfig,
        table: Arc<ReferenceTable>,
        transmitter: Arc<dyn Transmitter>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            session: FormSession::new(table),
            submission: SubmissionFlow::new(),
            focus: Focus::Contact(ContactField::Phone),
            notifications: Arc::new(NotificationQueue::new(config.notification_limit())),
            submit_attempted: false,
            transmitter,
            outcome_tx,
            outcome_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Tab order. Sections with a source start with their "same as" box.
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = ContactField::ALL.map(Focus::Contact).to_vec();
        for kind in AddressKind::ALL {
            if self.session.section(kind).source().is_some() {
                order.push(Focus::SameAs(kind));
            }
            order.extend(AddressField::ALL.iter().map(|f| Focus::Address(kind, *f)));
        }
        order.push(Focus::Save);
        order
    }

    /// Field errors to display inline
    pub fn visible_errors(&self) -> Option<ValidationErrors> {
        if !self.submit_attempted {
            return None;
        }
        self.session.validate().err()
    }

    /// Whether the focused element is editable right now
    pub fn is_disabled(&self, focus: Focus) -> bool {
        match focus {
            Focus::Address(kind, _) => self.session.section(kind).is_linked(),
            Focus::Save => self.submission.is_submitting(),
            _ => false,
        }
    }

    pub fn next_field(&mut self) {
        self.move_focus(1);
    }

    pub fn prev_field(&mut self) {
        self.move_focus(-1);
    }

    fn move_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let len = order.len() as isize;
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
        let next = order[(current + step).rem_euclid(len) as usize];
        self.set_focus(next);
    }

    /// Move focus, running the blur check when leaving the email field
    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus == Focus::Contact(ContactField::Email) && focus != self.focus {
            let email = &self.session.contact_details().email;
            if !is_email_shaped(email) {
                self.notifications.notify_error(EMAIL_BLUR_WARNING);
            }
        }
        self.focus = focus;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.quit = true,
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.prev_field(),
            _ => self.handle_focused_key(key),
        }
    }

    fn handle_focused_key(&mut self, key: KeyEvent) {
        // Unbound Ctrl/Alt chords are not text
        let modifiers = key.modifiers;
        let chord = modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if chord && matches!(key.code, KeyCode::Char(_)) {
            return;
        }

        match (self.focus, key.code) {
            (Focus::Save, KeyCode::Enter) => self.submit(),
            (Focus::SameAs(kind), KeyCode::Enter | KeyCode::Char(' ')) => {
                self.session.toggle_linked(kind);
            }
            (Focus::Contact(field), KeyCode::Char(c)) => {
                self.session.input_contact_char(field, c);
            }
            (Focus::Contact(field), KeyCode::Backspace) => {
                self.session.backspace_contact(field);
            }
            (Focus::Contact(_), KeyCode::Enter) => self.next_field(),
            (Focus::Address(kind, field), KeyCode::Right | KeyCode::Enter) if field.is_select() => {
                self.session.cycle_option(kind, field, true);
            }
            (Focus::Address(kind, field), KeyCode::Left) if field.is_select() => {
                self.session.cycle_option(kind, field, false);
            }
            (Focus::Address(kind, field), KeyCode::Char(c)) => {
                self.session.input_address_char(kind, field, c);
            }
            (Focus::Address(kind, field), KeyCode::Backspace) => {
                self.session.backspace_address(kind, field);
            }
            (Focus::Address(..), KeyCode::Enter) => self.next_field(),
            _ => {}
        }
    }

    /// Start a submission. The transmission runs on a background task and
    /// its outcome is picked up by [`App::poll_submission`].
    pub fn submit(&mut self) {
        self.submit_attempted = true;
        match self.submission.begin(&self.session) {
            Ok(payload) => {
                let transmitter = Arc::clone(&self.transmitter);
                let tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = transmitter.submit(payload).await;
                    if tx.send(outcome).is_err() {
                        tracing::warn!("form closed before transmission finished");
                    }
                });
            }
            Err(SubmitRefusal::InFlight) => {}
            Err(SubmitRefusal::Invalid(errors)) => {
                if let Some(first) = errors.iter().next() {
                    let focus = match first.field {
                        FieldRef::Contact(field) => Focus::Contact(field),
                        FieldRef::Address(kind, field) => Focus::Address(kind, field),
                    };
                    self.set_focus(focus);
                }
            }
        }
    }

    /// Apply any finished transmission
    pub fn poll_submission(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.submission.finish(outcome, self.notifications.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use crate::state::SubmissionPhase;
    use crate::transmit::MockTransmitter;
    use std::time::Duration;

    fn app_with(transmitter: MockTransmitter) -> App {
        let table = Arc::new(ReferenceTable::builtin().unwrap());
        App::new(&AppConfig::default(), table, Arc::new(transmitter))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn fill_valid_form(app: &mut App) {
        let session = &mut app.session;
        session.set_contact_field(ContactField::Phone, "9000000000");
        session.set_contact_field(ContactField::Whatsapp, "9000000001");
        session.set_contact_field(ContactField::Email, "a@b.com");
        let kind = AddressKind::Current;
        session.set_address_field(kind, AddressField::Address1, "1 Main St");
        session.set_address_field(kind, AddressField::City, "Town");
        session.set_address_field(kind, AddressField::Pincode, "123456");
        session.set_address_field(kind, AddressField::State, "Bihar");
        session.set_address_field(kind, AddressField::District, "Nalanda");
        session.set_linked(AddressKind::Permanent, true);
        session.set_linked(AddressKind::Distribution, true);
    }

    async fn settle(app: &mut App) {
        for _ in 0..50 {
            app.poll_submission();
            if !app.submission.is_submitting() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_focus_order_includes_same_as_boxes() {
        let app = app_with(MockTransmitter::new());
        let order = app.focus_order();
        assert_eq!(order.first(), Some(&Focus::Contact(ContactField::Phone)));
        assert_eq!(order.last(), Some(&Focus::Save));
        assert!(order.contains(&Focus::SameAs(AddressKind::Permanent)));
        assert!(!order.contains(&Focus::SameAs(AddressKind::Current)));
        assert_eq!(order.len(), 3 + 2 + 6 * 3 + 1);
    }

    #[test]
    fn test_tab_wraps_around() {
        let mut app = app_with(MockTransmitter::new());
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Save);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Contact(ContactField::Phone));
    }

    #[test]
    fn test_typing_into_phone_filters_non_digits() {
        let mut app = app_with(MockTransmitter::new());
        type_text(&mut app, "98x76543210999");
        assert_eq!(app.session.contact_details().phone, "9876543210");
    }

    #[test]
    fn test_leaving_malformed_email_warns() {
        let mut app = app_with(MockTransmitter::new());
        app.set_focus(Focus::Contact(ContactField::Email));
        type_text(&mut app, "not-an-email");
        app.handle_key(key(KeyCode::Tab));

        let current = app.notifications.current(Duration::from_secs(5)).unwrap();
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.message, EMAIL_BLUR_WARNING);
    }

    #[test]
    fn test_leaving_valid_email_is_silent() {
        let mut app = app_with(MockTransmitter::new());
        app.set_focus(Focus::Contact(ContactField::Email));
        type_text(&mut app, "a@b.com");
        app.handle_key(key(KeyCode::Tab));
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_chords_are_not_typed() {
        let mut app = app_with(MockTransmitter::new());
        app.set_focus(Focus::Contact(ContactField::Email));
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(app.session.contact_details().email, "");

        app.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(app.session.contact_details().email, "A");
    }

    #[test]
    fn test_space_toggles_same_as() {
        let mut app = app_with(MockTransmitter::new());
        let kind = AddressKind::Permanent;
        let source = AddressKind::Current;
        let city = AddressField::City;
        app.session.set_address_field(source, city, "Town");
        app.set_focus(Focus::SameAs(kind));
        app.handle_key(key(KeyCode::Char(' ')));

        assert!(app.session.section(kind).is_linked());
        assert!(app.is_disabled(Focus::Address(kind, AddressField::City)));
        let city = &app.session.store().address(kind).city;
        assert_eq!(city, "Town");
    }

    #[test]
    fn test_arrow_keys_cycle_state() {
        let mut app = app_with(MockTransmitter::new());
        let kind = AddressKind::Current;
        app.set_focus(Focus::Address(kind, AddressField::State));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.session.store().address(kind).state, "Bihar");
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.session.store().address(kind).state, "");
    }

    #[tokio::test]
    async fn test_invalid_submit_focuses_first_error() {
        let mut transmitter = MockTransmitter::new();
        transmitter.expect_submit().never();
        let mut app = app_with(transmitter);
        fill_valid_form(&mut app);
        app.session.set_contact_field(ContactField::Phone, "123");
        app.set_focus(Focus::Save);

        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.focus, Focus::Contact(ContactField::Phone));
        assert!(!app.submission.is_submitting());
        let errors = app.visible_errors().unwrap();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_refused_submit_from_email_runs_blur_check() {
        let mut transmitter = MockTransmitter::new();
        transmitter.expect_submit().never();
        let mut app = app_with(transmitter);
        app.set_focus(Focus::Contact(ContactField::Email));
        type_text(&mut app, "bad");

        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert_eq!(app.focus, Focus::Contact(ContactField::Phone));
        assert_eq!(app.session.contact_details().email, "bad");
        let current = app.notifications.current(Duration::from_secs(5)).unwrap();
        assert_eq!(current.kind, NotificationKind::Error);
        assert_eq!(current.message, EMAIL_BLUR_WARNING);
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let mut transmitter = MockTransmitter::new();
        transmitter
            .expect_submit()
            .times(1)
            .returning(|_| Ok(SubmissionReceipt::new()));
        let mut app = app_with(transmitter);
        fill_valid_form(&mut app);

        app.submit();
        assert!(app.submission.is_submitting());
        assert!(app.is_disabled(Focus::Save));
        app.submit();
        assert_eq!(app.submission.attempts(), 1);

        settle(&mut app).await;
        assert_eq!(app.submission.phase(), SubmissionPhase::Idle);
        assert_eq!(
            app.submission.last_outcome(),
            Some(SubmissionPhase::Success)
        );
        let successes = app
            .notifications
            .snapshot()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Success)
            .count();
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_form_stays_editable_while_submitting() {
        let mut transmitter = MockTransmitter::new();
        transmitter
            .expect_submit()
            .returning(|_| Ok(SubmissionReceipt::new()));
        let mut app = app_with(transmitter);
        fill_valid_form(&mut app);

        app.submit();
        let email = ContactField::Email;
        app.session.set_contact_field(email, "c@d.org");
        assert_eq!(app.session.contact_details().email, "c@d.org");
        settle(&mut app).await;
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app_with(MockTransmitter::new());
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());
    }
}
