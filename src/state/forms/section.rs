//! Address section controller
//!
//! Owns the editable value of one address section together with its
//! "same as" linkage. Every accepted change is reported to an
//! [`AddressListener`], normally the form store.

use super::field::AddressField;
use super::model::{Address, AddressKind};
use crate::state::ReferenceTable;
use std::sync::Arc;

/// Receiver of new address values
pub trait AddressListener {
    fn address_changed(&mut self, kind: AddressKind, address: &Address);
}

/// Outcome of a field edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Applied,
    Unchanged,
    /// Section mirrors its source and cannot be edited
    Locked,
}

#[derive(Debug, Clone)]
pub struct AddressSection {
    kind: AddressKind,
    value: Address,
    linked: bool,
    source: Option<AddressKind>,
    table: Arc<ReferenceTable>,
}

impl AddressSection {
    /// Empty, unlinked section that observes nothing yet
    pub fn new(kind: AddressKind, table: Arc<ReferenceTable>) -> Self {
        Self {
            kind,
            value: Address::default(),
            linked: false,
            source: None,
            table,
        }
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    pub fn value(&self) -> &Address {
        &self.value
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn source(&self) -> Option<AddressKind> {
        self.source
    }

    /// Checkbox label, present only when the section has a source
    pub fn same_as_label(&self) -> Option<String> {
        self.source.map(|s| format!("Same as {}", s.title()))
    }

    /// Point the section at a different source. Callers are responsible for
    /// re-syncing when the section is linked.
    pub(crate) fn set_source(&mut self, source: AddressKind) {
        self.source = Some(source);
    }

    /// Districts selectable for the current state; empty until a known
    /// state is chosen
    pub fn district_options(&self) -> &[String] {
        self.table.districts(&self.value.state)
    }

    /// Update one field.
    ///
    /// A change of state clears a district that does not belong to the new
    /// state.
    pub fn set_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
        listener: &mut dyn AddressListener,
    ) -> FieldUpdate {
        if self.linked {
            tracing::debug!(section = %self.kind, %field, "edit ignored while linked");
            return FieldUpdate::Locked;
        }

        let value = value.into();
        if self.value.get(field) == value {
            return FieldUpdate::Unchanged;
        }

        *self.value.get_mut(field) = value;
        if field == AddressField::State
            && !self
                .table
                .contains_district(&self.value.state, &self.value.district)
        {
            self.value.district.clear();
        }

        listener.address_changed(self.kind, &self.value);
        FieldUpdate::Applied
    }

    /// Step a select field (state or district) through its options.
    ///
    /// The empty "nothing selected" slot sits between the last and the first
    /// option.
    pub fn cycle_option(
        &mut self,
        field: AddressField,
        forward: bool,
        listener: &mut dyn AddressListener,
    ) -> FieldUpdate {
        let options: Vec<String> = match field {
            AddressField::State => self.table.states().map(str::to_string).collect(),
            AddressField::District => self.district_options().to_vec(),
            _ => return FieldUpdate::Unchanged,
        };
        if options.is_empty() {
            return FieldUpdate::Unchanged;
        }

        let current = options.iter().position(|o| o == self.value.get(field));
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(options.len() - 1),
            (Some(i), true) if i + 1 < options.len() => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        let value = next.map(|i| options[i].clone()).unwrap_or_default();
        self.set_field(field, value, listener)
    }

    /// Check or uncheck "same as".
    ///
    /// Linking copies `source` immediately. Unlinking keeps the copied value
    /// as the new editable starting point. Returns true when the value
    /// changed.
    pub fn set_linked(
        &mut self,
        flag: bool,
        source: Option<&Address>,
        listener: &mut dyn AddressListener,
    ) -> bool {
        if !flag {
            self.linked = false;
            return false;
        }

        match (self.source, source) {
            (Some(_), Some(address)) => {
                self.linked = true;
                self.copy_from(address, listener)
            }
            _ => {
                tracing::debug!(section = %self.kind, "no source to link to");
                false
            }
        }
    }

    /// Notification that the source section changed.
    /// Returns true when the value was re-copied.
    pub fn on_source_changed(
        &mut self,
        source: &Address,
        listener: &mut dyn AddressListener,
    ) -> bool {
        self.linked && self.copy_from(source, listener)
    }

    fn copy_from(&mut self, source: &Address, listener: &mut dyn AddressListener) -> bool {
        if &self.value == source {
            return false;
        }
        self.value = source.clone();
        listener.address_changed(self.kind, &self.value);
        true
    }
}
