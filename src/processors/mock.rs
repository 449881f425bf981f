use crate::domain::payment::{Processor, ProcessorPaymentRequest};
use crate::processors::{ForwardStatus, HealthReport, ProcessorClient};
use anyhow::Result;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockForward {
    Accept,
    Reject(u16),
    Hang,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockHealth {
    Healthy,
    Failing,
    Error,
    Hang,
}

#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub forward: MockForward,
    pub health: MockHealth,
    pub forward_delay: Duration,
    pub health_delay: Duration,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            forward: MockForward::Accept,
            health: MockHealth::Healthy,
            forward_delay: Duration::ZERO,
            health_delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct MockState {
    behaviors: HashMap<Processor, MockBehavior>,
    forwarded: Vec<(Processor, ProcessorPaymentRequest)>,
    health_calls: HashMap<Processor, usize>,
    in_flight: usize,
    peak_in_flight: usize,
}

/// Scripted stand-in for the processors. Records every call it receives.
#[derive(Default)]
pub struct MockProcessorClient {
    state: Mutex<MockState>,
}

impl MockProcessorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_behavior(&self, processor: Processor, behavior: MockBehavior) {
        self.state.lock().await.behaviors.insert(processor, behavior);
    }

    pub async fn set_forward(&self, processor: Processor, forward: MockForward) {
        let mut state = self.state.lock().await;
        state.behaviors.entry(processor).or_default().forward = forward;
    }

    pub async fn set_health(&self, processor: Processor, health: MockHealth) {
        let mut state = self.state.lock().await;
        state.behaviors.entry(processor).or_default().health = health;
    }

    pub async fn forwarded(&self) -> Vec<(Processor, ProcessorPaymentRequest)> {
        self.state.lock().await.forwarded.clone()
    }

    pub async fn health_calls(&self, processor: Processor) -> usize {
        self.state
            .lock()
            .await
            .health_calls
            .get(&processor)
            .copied()
            .unwrap_or(0)
    }

    /// Most forwards that were ever running at the same moment.
    pub async fn peak_in_flight(&self) -> usize {
        self.state.lock().await.peak_in_flight
    }

    async fn behavior(&self, processor: Processor) -> MockBehavior {
        self.state
            .lock()
            .await
            .behaviors
            .get(&processor)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ProcessorClient for MockProcessorClient {
    async fn forward(
        &self,
        processor: Processor,
        payment: &ProcessorPaymentRequest,
    ) -> Result<ForwardStatus> {
        let behavior = self.behavior(processor).await;
        {
            let mut state = self.state.lock().await;
            state.forwarded.push((processor, payment.clone()));
            state.in_flight += 1;
            state.peak_in_flight = state.peak_in_flight.max(state.in_flight);
        }

        if !behavior.forward_delay.is_zero() {
            tokio::time::sleep(behavior.forward_delay).await;
        }

        let status = match behavior.forward {
            MockForward::Accept => ForwardStatus::Accepted,
            MockForward::Reject(code) => ForwardStatus::Rejected(code),
            MockForward::Hang => {
                std::future::pending::<()>().await;
                ForwardStatus::Timeout
            }
            MockForward::Unreachable => ForwardStatus::Unreachable("mock connection refused".to_string()),
        };
        self.state.lock().await.in_flight -= 1;
        Ok(status)
    }

    async fn health(&self, processor: Processor) -> Result<HealthReport> {
        let behavior = self.behavior(processor).await;
        *self
            .state
            .lock()
            .await
            .health_calls
            .entry(processor)
            .or_insert(0) += 1;

        if !behavior.health_delay.is_zero() {
            tokio::time::sleep(behavior.health_delay).await;
        }

        match behavior.health {
            MockHealth::Healthy => Ok(HealthReport {
                failing: false,
                min_response_time: 0,
            }),
            MockHealth::Failing => Ok(HealthReport {
                failing: true,
                min_response_time: 0,
            }),
            MockHealth::Error => anyhow::bail!("mock health endpoint returned HTTP 500"),
            MockHealth::Hang => {
                std::future::pending::<()>().await;
                anyhow::bail!("unreachable")
            }
        }
    }
}
