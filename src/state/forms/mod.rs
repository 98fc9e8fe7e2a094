//! Form domain layer
//!
//! Contact details, the three address sections with their "same as"
//! linkage, field validation and the store that holds the latest values.

mod field;
mod model;
mod section;
mod session;
mod store;
mod validation;

pub use field::{AddressField, ContactField};
pub use model::{AddressKind, ApplicationPayload};
pub use session::FormSession;
pub use validation::{is_email_shaped, FieldRef, ValidationErrors, EMAIL_BLUR_WARNING};
