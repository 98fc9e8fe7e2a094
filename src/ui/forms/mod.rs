//! Form rendering module
//!
//! - `field_renderer`: line builders for single fields and checkboxes
//! - `application_form`: the distributor application form

mod application_form;
mod field_renderer;

pub use application_form::{draw_application_form, draw_save_button};
