use crate::domain::payment::Processor;
use crate::health::HealthStateStore;
use crate::processors::ProcessorClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct HealthProber {
    pub health_store: Arc<dyn HealthStateStore>,
    pub client: Arc<dyn ProcessorClient>,
    pub timeout: Duration,
}

impl HealthProber {
    pub fn new(
        health_store: Arc<dyn HealthStateStore>,
        client: Arc<dyn ProcessorClient>,
        timeout: Duration,
    ) -> Self {
        Self {
            health_store,
            client,
            timeout,
        }
    }

    /// Asks the processor for its health and records the answer. Every kind
    /// of failure to get a well-formed answer counts as failing. Returns the
    /// failing verdict.
    pub async fn probe(&self, processor: Processor) -> bool {
        let failing = match tokio::time::timeout(self.timeout, self.client.health(processor)).await {
            Ok(Ok(report)) => report.failing,
            Ok(Err(e)) => {
                tracing::warn!("health probe for {} failed: {:#}", processor, e);
                true
            }
            Err(_) => {
                tracing::warn!("health probe for {} timed out after {:?}", processor, self.timeout);
                true
            }
        };

        let recorded = if failing {
            self.health_store.mark_failing(processor).await
        } else {
            self.health_store.clear_failing(processor).await
        };
        if let Err(e) = recorded {
            tracing::error!("could not record health of {}: {:#}", processor, e);
        }

        tracing::debug!("probed {}: failing={}", processor, failing);
        failing
    }

    /// Probes only when this caller wins the probe lock. `None` means another
    /// probe was issued within the current interval.
    pub async fn probe_if_due(&self, processor: Processor) -> Option<bool> {
        match self.health_store.try_acquire_probe_lock(processor).await {
            Ok(true) => Some(self.probe(processor).await),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!("probe lock for {} unavailable: {:#}", processor, e);
                None
            }
        }
    }
}
