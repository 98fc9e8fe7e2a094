//! Contact and address value types

use super::field::{AddressField, ContactField};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contact section of the application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
}

impl ContactDetails {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Phone => &self.phone,
            ContactField::Whatsapp => &self.whatsapp,
            ContactField::Email => &self.email,
        }
    }

    pub fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Phone => &mut self.phone,
            ContactField::Whatsapp => &mut self.whatsapp,
            ContactField::Email => &mut self.email,
        }
    }
}

/// One structured address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub pincode: String,
    pub state: String,
    pub district: String,
}

impl Address {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Address1 => &self.address1,
            AddressField::Address2 => &self.address2,
            AddressField::City => &self.city,
            AddressField::Pincode => &self.pincode,
            AddressField::State => &self.state,
            AddressField::District => &self.district,
        }
    }

    pub fn get_mut(&mut self, field: AddressField) -> &mut String {
        match field {
            AddressField::Address1 => &mut self.address1,
            AddressField::Address2 => &mut self.address2,
            AddressField::City => &mut self.city,
            AddressField::Pincode => &mut self.pincode,
            AddressField::State => &mut self.state,
            AddressField::District => &mut self.district,
        }
    }

    /// True when no field has been filled in
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        AddressField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// The three address sections of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressKind {
    Current,
    Permanent,
    Distribution,
}

impl AddressKind {
    pub const ALL: [AddressKind; 3] = [
        AddressKind::Current,
        AddressKind::Permanent,
        AddressKind::Distribution,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::Current => "Current Address",
            Self::Permanent => "Permanent Address",
            Self::Distribution => "Distribution Centre Address",
        }
    }

    /// Section this one may mirror through its "same as" checkbox
    pub fn default_source(self) -> Option<AddressKind> {
        match self {
            Self::Current => None,
            Self::Permanent => Some(Self::Current),
            Self::Distribution => Some(Self::Permanent),
        }
    }

    /// Position in [`AddressKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            Self::Current => 0,
            Self::Permanent => 1,
            Self::Distribution => 2,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Permanent => "permanent",
            Self::Distribution => "distribution",
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// All three addresses keyed by section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addresses {
    pub current: Address,
    pub permanent: Address,
    pub distribution: Address,
}

impl Addresses {
    pub fn get(&self, kind: AddressKind) -> &Address {
        match kind {
            AddressKind::Current => &self.current,
            AddressKind::Permanent => &self.permanent,
            AddressKind::Distribution => &self.distribution,
        }
    }

    pub fn get_mut(&mut self, kind: AddressKind) -> &mut Address {
        match kind {
            AddressKind::Current => &mut self.current,
            AddressKind::Permanent => &mut self.permanent,
            AddressKind::Distribution => &mut self.distribution,
        }
    }
}

/// Snapshot of the whole form handed to the transmitter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    pub contact_details: ContactDetails,
    pub addresses: Addresses,
}
