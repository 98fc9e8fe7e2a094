//! Trait abstraction for application transmission to enable mocking in tests

use crate::state::ApplicationPayload;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement returned for an accepted application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub accepted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            reference: Uuid::new_v4(),
            accepted_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends a validated application to whatever backend accepts it.
/// Any error (transport failure, timeout, rejection) counts as a failed
/// submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transmitter: Send + Sync {
    async fn submit(&self, payload: ApplicationPayload) -> Result<SubmissionReceipt>;
}
