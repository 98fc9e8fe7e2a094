//! Transmission of completed applications
//!
//! The real backend contract is not defined yet; the form only talks to the
//! [`Transmitter`] trait and ships with a simulated implementation.

mod simulated;
mod traits;

pub use simulated::SimulatedTransmitter;
pub use traits::{SubmissionReceipt, Transmitter};

#[cfg(test)]
pub use traits::MockTransmitter;
