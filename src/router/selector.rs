use crate::domain::payment::Processor;
use crate::health::prober::HealthProber;
use crate::health::HealthStateStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProcessorSelector {
    pub health_store: Arc<dyn HealthStateStore>,
    pub prober: HealthProber,
}

impl ProcessorSelector {
    pub fn new(health_store: Arc<dyn HealthStateStore>, prober: HealthProber) -> Self {
        Self {
            health_store,
            prober,
        }
    }

    /// Picks the processor for one payment. Never returns "none": with both
    /// flags set, `default` is cleared and tried again.
    pub async fn choose(&self) -> Processor {
        if !self.is_failing(Processor::Default).await {
            return Processor::Default;
        }

        self.prober.probe_if_due(Processor::Fallback).await;
        if !self.is_failing(Processor::Fallback).await {
            tracing::debug!("default failing, routing to fallback");
            return Processor::Fallback;
        }

        if let Err(e) = self.health_store.clear_failing(Processor::Default).await {
            tracing::warn!("could not clear default failing flag: {:#}", e);
        }
        tracing::debug!("both processors failing, retrying default");
        Processor::Default
    }

    // An unreadable flag resolves toward the primary.
    async fn is_failing(&self, processor: Processor) -> bool {
        match self.health_store.is_failing(processor).await {
            Ok(failing) => failing,
            Err(e) => {
                tracing::warn!("health flag for {} unreadable: {:#}", processor, e);
                false
            }
        }
    }
}
