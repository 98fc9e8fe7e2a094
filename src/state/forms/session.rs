//! Form session: store, address sections and their subscriptions

use super::field::{AddressField, ContactField};
use super::model::{Address, AddressKind, ContactDetails};
use super::section::{AddressSection, FieldUpdate};
use super::store::FormStore;
use super::validation::{validate_application, ValidationErrors};
use crate::state::ReferenceTable;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

/// Rejected "same as" wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("{0} address cannot mirror itself")]
    SelfLink(AddressKind),
    #[error("linking {dependent} to {upstream} would form a cycle")]
    Cycle {
        dependent: AddressKind,
        upstream: AddressKind,
    },
}

/// One application form being filled in.
///
/// Every mutation goes through the session so that the store and any linked
/// sections are updated in the same step.
#[derive(Debug, Clone)]
pub struct FormSession {
    store: FormStore,
    sections: [AddressSection; 3],
    table: Arc<ReferenceTable>,
}

impl FormSession {
    /// Empty form. Permanent observes Current, Distribution observes
    /// Permanent.
    pub fn new(table: Arc<ReferenceTable>) -> Self {
        let section = |kind| AddressSection::new(kind, table.clone());
        let mut session = Self {
            store: FormStore::new(),
            sections: AddressKind::ALL.map(section),
            table,
        };
        for kind in AddressKind::ALL {
            let Some(source) = kind.default_source() else {
                continue;
            };
            if let Err(err) = session.subscribe(kind, source) {
                tracing::error!("default wiring rejected: {err}");
            }
        }
        session
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn section(&self, kind: AddressKind) -> &AddressSection {
        &self.sections[kind.index()]
    }

    pub fn contact_details(&self) -> &ContactDetails {
        self.store.contact_details()
    }

    /// Validate the current snapshot
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_application(&self.store.snapshot(), &self.table)
    }

    /// Sections that observe `source`
    pub fn subscribers(&self, source: AddressKind) -> Vec<AddressKind> {
        self.sections
            .iter()
            .filter(|s| s.source() == Some(source))
            .map(AddressSection::kind)
            .collect()
    }

    /// Make `dependent` observe `source`, replacing its previous source.
    /// A linked dependent is re-synced from the new source immediately.
    pub fn subscribe(
        &mut self,
        dependent: AddressKind,
        source: AddressKind,
    ) -> Result<(), LinkError> {
        if dependent == source {
            return Err(LinkError::SelfLink(dependent));
        }
        let mut cursor = Some(source);
        while let Some(kind) = cursor {
            if kind == dependent {
                return Err(LinkError::Cycle {
                    dependent,
                    upstream: source,
                });
            }
            cursor = self.section(kind).source();
        }

        let value = self.store.address(source).clone();
        let section = &mut self.sections[dependent.index()];
        section.set_source(source);
        tracing::debug!(%dependent, %source, "subscribed");

        if section.on_source_changed(&value, &mut self.store) {
            self.propagate(dependent);
        }
        Ok(())
    }

    pub fn set_contact_details(&mut self, details: ContactDetails) {
        self.store.set_contact_details(details);
    }

    pub fn set_contact_field(&mut self, field: ContactField, value: impl Into<String>) {
        let mut details = self.store.contact_details().clone();
        *details.get_mut(field) = value.into();
        self.set_contact_details(details);
    }

    /// Apply a keystroke to a contact field, honouring its input rule
    pub fn input_contact_char(&mut self, field: ContactField, c: char) -> bool {
        let mut value = self.contact_details().get(field).to_string();
        if !field.input_rule().push_char(&mut value, c) {
            return false;
        }
        self.set_contact_field(field, value);
        true
    }

    pub fn backspace_contact(&mut self, field: ContactField) -> bool {
        let mut value = self.contact_details().get(field).to_string();
        if !field.input_rule().pop_char(&mut value) {
            return false;
        }
        self.set_contact_field(field, value);
        true
    }

    pub fn set_address_field(
        &mut self,
        kind: AddressKind,
        field: AddressField,
        value: impl Into<String>,
    ) -> FieldUpdate {
        let section = &mut self.sections[kind.index()];
        let update = section.set_field(field, value, &mut self.store);
        if update == FieldUpdate::Applied {
            self.propagate(kind);
        }
        update
    }

    /// Apply a keystroke to an address field, honouring its input rule
    pub fn input_address_char(
        &mut self,
        kind: AddressKind,
        field: AddressField,
        c: char,
    ) -> FieldUpdate {
        let mut value = self.section(kind).value().get(field).to_string();
        if !field.input_rule().push_char(&mut value, c) {
            return FieldUpdate::Unchanged;
        }
        self.set_address_field(kind, field, value)
    }

    pub fn backspace_address(&mut self, kind: AddressKind, field: AddressField) -> FieldUpdate {
        let mut value = self.section(kind).value().get(field).to_string();
        if !field.input_rule().pop_char(&mut value) {
            return FieldUpdate::Unchanged;
        }
        self.set_address_field(kind, field, value)
    }

    pub fn cycle_option(
        &mut self,
        kind: AddressKind,
        field: AddressField,
        forward: bool,
    ) -> FieldUpdate {
        let section = &mut self.sections[kind.index()];
        let update = section.cycle_option(field, forward, &mut self.store);
        if update == FieldUpdate::Applied {
            self.propagate(kind);
        }
        update
    }

    /// Check or uncheck the "same as" box of a section
    pub fn set_linked(&mut self, kind: AddressKind, flag: bool) {
        let source: Option<Address> = self
            .section(kind)
            .source()
            .map(|s| self.store.address(s).clone());
        let section = &mut self.sections[kind.index()];
        let changed = section.set_linked(flag, source.as_ref(), &mut self.store);
        tracing::debug!(section = %kind, linked = flag, changed, "same-as toggled");
        if changed {
            self.propagate(kind);
        }
    }

    pub fn toggle_linked(&mut self, kind: AddressKind) {
        let flag = !self.section(kind).is_linked();
        self.set_linked(kind, flag);
    }

    /// Push the value of `changed` to every section observing it, and on
    /// down the chain
    fn propagate(&mut self, changed: AddressKind) {
        let mut queue = VecDeque::from([changed]);
        while let Some(source) = queue.pop_front() {
            let value = self.store.address(source).clone();
            for dependent in self.subscribers(source) {
                let section = &mut self.sections[dependent.index()];
                if section.on_source_changed(&value, &mut self.store) {
                    queue.push_back(dependent);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> FormSession {
        FormSession::new(Arc::new(ReferenceTable::builtin().unwrap()))
    }

    fn fill_current(session: &mut FormSession) {
        let kind = AddressKind::Current;
        session.set_address_field(kind, AddressField::Address1, "1 Main St");
        session.set_address_field(kind, AddressField::City, "Town");
        session.set_address_field(kind, AddressField::Pincode, "123456");
        session.set_address_field(kind, AddressField::State, "Bihar");
        session.set_address_field(kind, AddressField::District, "Patna");
    }

    #[test]
    fn test_edits_reach_the_store() {
        let mut session = session();
        fill_current(&mut session);
        let current = session.store().address(AddressKind::Current);
        assert_eq!(current.district, "Patna");
        assert_eq!(current, session.section(AddressKind::Current).value());
    }

    #[test]
    fn test_linking_copies_immediately() {
        let mut session = session();
        fill_current(&mut session);
        session.set_linked(AddressKind::Permanent, true);

        assert_eq!(
            session.store().address(AddressKind::Permanent),
            session.store().address(AddressKind::Current)
        );
    }

    #[test]
    fn test_source_edits_propagate_while_linked() {
        let mut session = session();
        fill_current(&mut session);
        session.set_linked(AddressKind::Permanent, true);

        session.set_address_field(AddressKind::Current, AddressField::City, "Gaya Town");
        let permanent = session.store().address(AddressKind::Permanent);
        assert_eq!(permanent.city, "Gaya Town");
    }

    #[test]
    fn test_propagation_is_transitive() {
        let mut session = session();
        session.set_linked(AddressKind::Permanent, true);
        session.set_linked(AddressKind::Distribution, true);
        fill_current(&mut session);

        let current = session.store().address(AddressKind::Current).clone();
        assert_eq!(session.store().address(AddressKind::Permanent), &current);
        assert_eq!(session.store().address(AddressKind::Distribution), &current);
    }

    #[test]
    fn test_unlinking_freezes_value() {
        let mut session = session();
        fill_current(&mut session);
        session.set_linked(AddressKind::Permanent, true);
        session.set_linked(AddressKind::Permanent, false);

        session.set_address_field(AddressKind::Current, AddressField::City, "Elsewhere");
        assert_eq!(session.store().address(AddressKind::Permanent).city, "Town");

        let update = session.set_address_field(AddressKind::Permanent, AddressField::City, "Mine");
        assert_eq!(update, FieldUpdate::Applied);
        assert_eq!(session.store().address(AddressKind::Permanent).city, "Mine");
    }

    #[test]
    fn test_linked_section_is_read_only() {
        let mut session = session();
        fill_current(&mut session);
        session.toggle_linked(AddressKind::Permanent);
        let update = session.set_address_field(AddressKind::Permanent, AddressField::City, "Mine");
        assert_eq!(update, FieldUpdate::Locked);
        assert_eq!(session.store().address(AddressKind::Permanent).city, "Town");
    }

    #[test]
    fn test_state_change_on_source_clears_district_downstream() {
        let mut session = session();
        fill_current(&mut session);
        session.set_linked(AddressKind::Permanent, true);

        session.set_address_field(AddressKind::Current, AddressField::State, "Goa");
        assert_eq!(session.store().address(AddressKind::Current).district, "");
        assert_eq!(session.store().address(AddressKind::Permanent).district, "");
        assert_eq!(session.store().address(AddressKind::Permanent).state, "Goa");
    }

    #[test]
    fn test_subscribe_rejects_self_and_cycles() {
        let mut session = session();
        assert_eq!(
            session.subscribe(AddressKind::Current, AddressKind::Current),
            Err(LinkError::SelfLink(AddressKind::Current))
        );
        assert_eq!(
            session.subscribe(AddressKind::Current, AddressKind::Distribution),
            Err(LinkError::Cycle {
                dependent: AddressKind::Current,
                upstream: AddressKind::Distribution,
            })
        );
    }

    #[test]
    fn test_resubscribe_resyncs_linked_section() {
        let mut session = session();
        fill_current(&mut session);
        session.set_linked(AddressKind::Distribution, true);
        let distribution = session.store().address(AddressKind::Distribution);
        assert!(distribution.is_empty());

        session
            .subscribe(AddressKind::Distribution, AddressKind::Current)
            .unwrap();
        assert_eq!(
            session.store().address(AddressKind::Distribution),
            session.store().address(AddressKind::Current)
        );
        assert_eq!(
            session.subscribers(AddressKind::Current),
            vec![AddressKind::Permanent, AddressKind::Distribution]
        );
    }

    #[test]
    fn test_new_session_wires_default_sources() {
        let session = session();
        assert_eq!(
            session.subscribers(AddressKind::Current),
            vec![AddressKind::Permanent]
        );
        assert_eq!(
            session.subscribers(AddressKind::Permanent),
            vec![AddressKind::Distribution]
        );
        assert!(session.subscribers(AddressKind::Distribution).is_empty());
        let label = session.section(AddressKind::Distribution).same_as_label();
        assert_eq!(label.as_deref(), Some("Same as Permanent Address"));
    }

    #[test]
    fn test_keystrokes_follow_input_rules() {
        let mut session = session();
        for c in "90000abc000001".chars() {
            session.input_contact_char(ContactField::Phone, c);
        }
        assert_eq!(session.contact_details().phone, "9000000000");
        assert!(session.backspace_contact(ContactField::Phone));
        assert_eq!(session.contact_details().phone, "900000000");

        for c in "8000012".chars() {
            session.input_address_char(AddressKind::Current, AddressField::Pincode, c);
        }
        let current = session.store().address(AddressKind::Current);
        assert_eq!(current.pincode, "800001");
    }

    #[test]
    fn test_validate_uses_whole_form() {
        let mut session = session();
        fill_current(&mut session);
        session.set_contact_details(ContactDetails {
            phone: "9000000000".to_string(),
            whatsapp: "9000000001".to_string(),
            email: "a@b.com".to_string(),
        });
        assert!(session.validate().is_err());

        session.set_linked(AddressKind::Permanent, true);
        session.set_linked(AddressKind::Distribution, true);
        assert!(session.validate().is_ok());
    }
}
