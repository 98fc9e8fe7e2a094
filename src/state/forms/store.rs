//! Form aggregate store

use super::model::{Address, AddressKind, ApplicationPayload, ContactDetails};
use super::section::AddressListener;

/// Holder of the latest contact details and addresses.
///
/// Pure data sink: it never validates and has no side effects beyond
/// replacing what it holds.
#[derive(Debug, Clone, Default)]
pub struct FormStore {
    data: ApplicationPayload,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_details(&self) -> &ContactDetails {
        &self.data.contact_details
    }

    pub fn address(&self, kind: AddressKind) -> &Address {
        self.data.addresses.get(kind)
    }

    pub fn set_contact_details(&mut self, details: ContactDetails) {
        self.data.contact_details = details;
    }

    pub fn set_address(&mut self, kind: AddressKind, address: Address) {
        *self.data.addresses.get_mut(kind) = address;
    }

    /// Copy of everything held, ready for submission
    pub fn snapshot(&self) -> ApplicationPayload {
        self.data.clone()
    }
}

impl AddressListener for FormStore {
    fn address_changed(&mut self, kind: AddressKind, address: &Address) {
        self.set_address(kind, address.clone());
    }
}
