use crate::domain::payment::Processor;
use anyhow::Result;
use std::time::Duration;

pub mod prober;
pub mod store_memory;
pub mod store_redis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthTtls {
    pub failing: Duration,
    pub probe_lock: Duration,
}

impl HealthTtls {
    pub fn from_interval(interval: Duration) -> Self {
        Self {
            failing: interval * 3,
            probe_lock: interval,
        }
    }
}

/// Shared health flags, visible to every gateway instance.
///
/// The failing flag and the probe lock are independent keys. Both expire on
/// their own, so a processor that recovers silently gets retried without an
/// explicit clear.
#[async_trait::async_trait]
pub trait HealthStateStore: Send + Sync {
    async fn is_failing(&self, processor: Processor) -> Result<bool>;

    async fn mark_failing(&self, processor: Processor) -> Result<()>;

    async fn clear_failing(&self, processor: Processor) -> Result<()>;

    /// Set-if-absent with expiry, as one atomic step. Returns whether this
    /// caller took the lock.
    async fn try_acquire_probe_lock(&self, processor: Processor) -> Result<bool>;

    async fn is_probe_locked(&self, processor: Processor) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}

pub(crate) fn failing_key(processor: Processor) -> String {
    format!("health:failing:{}", processor.as_str())
}

pub(crate) fn probe_lock_key(processor: Processor) -> String {
    format!("health:probe_lock:{}", processor.as_str())
}
