//! Field-level validation rules

use super::field::{AddressField, ContactField};
use super::model::{Address, AddressKind, ApplicationPayload, ContactDetails};
use crate::state::ReferenceTable;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Advisory shown when focus leaves a malformed email field
pub const EMAIL_BLUR_WARNING: &str = "Please enter a valid email address";

/// local@domain.tld, no whitespace and a single '@'
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// True when `email` looks like local@domain.tld
pub fn is_email_shaped(email: &str) -> bool {
    email_shape().is_match(email)
}

/// Which part of the form a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRef {
    Contact(ContactField),
    Address(AddressKind, AddressField),
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Contact(field) => write!(f, "contact.{field}"),
            FieldRef::Address(kind, field) => write!(f, "{kind}.{field}"),
        }
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldRef,
    pub message: String,
}

impl FieldError {
    fn new(field: FieldRef, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered list of field errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First message recorded for a field
    pub fn message_for(&self, field: FieldRef) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn digit_string(value: &str, len: usize, length_msg: &str, digits_msg: &str) -> Option<String> {
    if value.chars().count() != len {
        Some(length_msg.to_string())
    } else if !value.chars().all(|c| c.is_ascii_digit()) {
        Some(digits_msg.to_string())
    } else {
        None
    }
}

/// Message for one contact field, if it is invalid
pub fn check_contact_field(field: ContactField, value: &str) -> Option<String> {
    match field {
        ContactField::Phone => digit_string(
            value,
            10,
            "Phone number must be 10 digits",
            "Phone number must contain only digits",
        ),
        ContactField::Whatsapp => digit_string(
            value,
            10,
            "WhatsApp number must be 10 digits",
            "WhatsApp number must contain only digits",
        ),
        ContactField::Email => {
            if value.is_empty() {
                Some("Email is required".to_string())
            } else if !is_email_shaped(value) {
                Some("Invalid email format".to_string())
            } else {
                None
            }
        }
    }
}

/// Message for one address field, if it is invalid.
///
/// District is checked against the address's own state, so the whole
/// address is needed.
pub fn check_address_field(
    field: AddressField,
    address: &Address,
    table: &ReferenceTable,
) -> Option<String> {
    let required = |value: &str, msg: &str| value.trim().is_empty().then(|| msg.to_string());
    match field {
        AddressField::Address1 => required(&address.address1, "Address is required"),
        AddressField::Address2 => None,
        AddressField::City => required(&address.city, "City is required"),
        AddressField::Pincode => digit_string(
            &address.pincode,
            6,
            "Pincode must be 6 digits",
            "Pincode must contain only digits",
        ),
        AddressField::State => {
            (!table.contains_state(&address.state)).then(|| "Please select a state".to_string())
        }
        AddressField::District => {
            if let Some(msg) = required(&address.district, "District is required") {
                Some(msg)
            } else if table.contains_state(&address.state)
                && !table.contains_district(&address.state, &address.district)
            {
                let state = &address.state;
                Some(format!("Please select a valid district for {state}"))
            } else {
                None
            }
        }
    }
}

/// Validate the contact section
pub fn validate_contact(contact: &ContactDetails) -> Result<(), ValidationErrors> {
    let errors = ContactField::ALL
        .iter()
        .filter_map(|&field| {
            check_contact_field(field, contact.get(field))
                .map(|msg| FieldError::new(FieldRef::Contact(field), msg))
        })
        .collect();
    ValidationErrors(errors).into_result()
}

/// Validate one address section
pub fn validate_address(
    kind: AddressKind,
    address: &Address,
    table: &ReferenceTable,
) -> Result<(), ValidationErrors> {
    let errors = AddressField::ALL
        .iter()
        .filter_map(|&field| {
            check_address_field(field, address, table)
                .map(|msg| FieldError::new(FieldRef::Address(kind, field), msg))
        })
        .collect();
    ValidationErrors(errors).into_result()
}

/// Validate contact details and all three addresses, in form order
pub fn validate_application(
    payload: &ApplicationPayload,
    table: &ReferenceTable,
) -> Result<(), ValidationErrors> {
    let mut all = Vec::new();
    if let Err(ValidationErrors(errors)) = validate_contact(&payload.contact_details) {
        all.extend(errors);
    }
    for kind in AddressKind::ALL {
        if let Err(ValidationErrors(errors)) =
            validate_address(kind, payload.addresses.get(kind), table)
        {
            all.extend(errors);
        }
    }
    ValidationErrors(all).into_result()
}
