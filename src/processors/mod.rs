use crate::domain::payment::{Processor, ProcessorPaymentRequest};
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod mock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardStatus {
    Accepted,
    Rejected(u16),
    Timeout,
    Unreachable(String),
}

impl ForwardStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ForwardStatus::Accepted)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthReport {
    pub failing: bool,
    #[serde(rename = "minResponseTime", default)]
    pub min_response_time: u64,
}

/// Outbound calls to the two payment processors. Callers bound every call
/// with their own timeout, so implementations need not.
#[async_trait::async_trait]
pub trait ProcessorClient: Send + Sync {
    async fn forward(
        &self,
        processor: Processor,
        payment: &ProcessorPaymentRequest,
    ) -> Result<ForwardStatus>;

    /// Any non-success status or malformed body is an error.
    async fn health(&self, processor: Processor) -> Result<HealthReport>;
}
