//! Stand-in transmitter that waits and then accepts

use super::traits::{SubmissionReceipt, Transmitter};
use crate::config::AppConfig;
use crate::state::ApplicationPayload;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Default simulated round-trip
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

/// Logs the payload, sleeps for a fixed delay and succeeds, unless built
/// to fail.
#[derive(Debug, Clone)]
pub struct SimulatedTransmitter {
    delay: Duration,
    fail: bool,
}

impl SimulatedTransmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            delay: config.submit_delay(),
            fail: config.simulate_failure(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedTransmitter {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl Transmitter for SimulatedTransmitter {
    async fn submit(&self, payload: ApplicationPayload) -> Result<SubmissionReceipt> {
        let body = serde_json::to_string(&payload)?;
        tracing::info!(
            payload = %body,
            delay_ms = self.delay.as_millis() as u64,
            "transmitting application"
        );

        tokio::time::sleep(self.delay).await;

        if self.fail {
            bail!("simulated transmission failure");
        }
        let receipt = SubmissionReceipt::new();
        tracing::info!(reference = %receipt.reference, "application accepted");
        Ok(receipt)
    }
}
