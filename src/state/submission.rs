//! Submission state machine
//!
//! Idle → Submitting → (Success | Failure) → Idle. The Submitting phase is
//! the single in-flight guard: while it holds, further submit requests are
//! refused without side effects.

use super::forms::{ApplicationPayload, FormSession, ValidationErrors};
use crate::notify::Notifier;
use crate::transmit::SubmissionReceipt;
use thiserror::Error;

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully!";
pub const FAILURE_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Failure,
}

/// Why a submit request did not start a transmission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRefusal {
    #[error("a submission is already in flight")]
    InFlight,
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Default)]
pub struct SubmissionFlow {
    phase: SubmissionPhase,
    attempts: u32,
    last_outcome: Option<SubmissionPhase>,
    last_receipt: Option<SubmissionReceipt>,
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    /// Number of transmissions started
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Success or Failure of the most recent finished transmission
    pub fn last_outcome(&self) -> Option<SubmissionPhase> {
        self.last_outcome
    }

    pub fn last_receipt(&self) -> Option<&SubmissionReceipt> {
        self.last_receipt.as_ref()
    }

    /// Validate the form and enter Submitting.
    ///
    /// Returns the payload to transmit. On refusal the phase is unchanged.
    pub fn begin(&mut self, session: &FormSession) -> Result<ApplicationPayload, SubmitRefusal> {
        if self.is_submitting() {
            tracing::debug!("submit ignored, transmission in flight");
            return Err(SubmitRefusal::InFlight);
        }

        if let Err(errors) = session.validate() {
            tracing::info!(errors = errors.len(), "submission blocked by validation");
            return Err(errors.into());
        }

        self.phase = SubmissionPhase::Submitting;
        self.attempts += 1;
        tracing::info!(attempt = self.attempts, "submission started");
        Ok(session.store().snapshot())
    }

    /// Settle the in-flight transmission, notify the user and return to
    /// Idle. Returns the settled phase (Success or Failure).
    pub fn finish(
        &mut self,
        outcome: anyhow::Result<SubmissionReceipt>,
        notifier: &dyn Notifier,
    ) -> SubmissionPhase {
        if !self.is_submitting() {
            tracing::warn!(
                phase = ?self.phase,
                "transmission outcome without a submission in flight"
            );
            return self.phase;
        }

        let settled = match outcome {
            Ok(receipt) => {
                tracing::info!(reference = %receipt.reference, "submission succeeded");
                self.last_receipt = Some(receipt);
                self.phase = SubmissionPhase::Success;
                notifier.notify_success(SUCCESS_MESSAGE);
                SubmissionPhase::Success
            }
            Err(err) => {
                tracing::error!("submission failed: {err:#}");
                self.phase = SubmissionPhase::Failure;
                notifier.notify_error(FAILURE_MESSAGE);
                SubmissionPhase::Failure
            }
        };

        self.last_outcome = Some(settled);
        self.phase = SubmissionPhase::Idle;
        settled
    }
}
