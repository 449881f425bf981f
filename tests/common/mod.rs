#![allow(dead_code)]

use payments_intake_gateway::health::prober::HealthProber;
use payments_intake_gateway::health::store_memory::HealthStoreMemory;
use payments_intake_gateway::health::{HealthStateStore, HealthTtls};
use payments_intake_gateway::processors::mock::MockProcessorClient;
use payments_intake_gateway::processors::ProcessorClient;
use payments_intake_gateway::repo::payments_memory::PaymentsMemoryStore;
use payments_intake_gateway::repo::payments_repo::PaymentStore;
use payments_intake_gateway::router::selector::ProcessorSelector;
use payments_intake_gateway::service::dispatcher::PaymentForwarder;
use std::sync::Arc;
use std::time::Duration;

pub const INTERVAL: Duration = Duration::from_secs(5);
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);
pub const FORWARD_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Harness {
    pub client: Arc<MockProcessorClient>,
    pub health: Arc<HealthStoreMemory>,
    pub payments: Arc<PaymentsMemoryStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            client: Arc::new(MockProcessorClient::new()),
            health: Arc::new(HealthStoreMemory::new(HealthTtls::from_interval(INTERVAL))),
            payments: Arc::new(PaymentsMemoryStore::new()),
        }
    }

    pub fn prober(&self) -> HealthProber {
        let health: Arc<dyn HealthStateStore> = self.health.clone();
        let client: Arc<dyn ProcessorClient> = self.client.clone();
        HealthProber::new(health, client, PROBE_TIMEOUT)
    }

    pub fn selector(&self) -> ProcessorSelector {
        let health: Arc<dyn HealthStateStore> = self.health.clone();
        ProcessorSelector::new(health, self.prober())
    }

    pub fn forwarder(&self) -> PaymentForwarder {
        let payments: Arc<dyn PaymentStore> = self.payments.clone();
        self.forwarder_with_store(payments)
    }

    pub fn forwarder_with_store(&self, payments: Arc<dyn PaymentStore>) -> PaymentForwarder {
        PaymentForwarder {
            selector: self.selector(),
            client: self.client.clone(),
            health_store: self.health.clone(),
            payment_store: payments,
            forward_timeout: FORWARD_TIMEOUT,
        }
    }
}
