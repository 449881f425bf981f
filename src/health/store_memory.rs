use crate::domain::payment::Processor;
use crate::health::{failing_key, probe_lock_key, HealthStateStore, HealthTtls};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Single-process health flags. Expiry is checked on read against the tokio
/// clock.
#[derive(Clone)]
pub struct HealthStoreMemory {
    expiries: Arc<Mutex<HashMap<String, Instant>>>,
    ttls: HealthTtls,
}

impl HealthStoreMemory {
    pub fn new(ttls: HealthTtls) -> Self {
        Self {
            expiries: Arc::new(Mutex::new(HashMap::new())),
            ttls,
        }
    }

    async fn is_live(&self, key: &str) -> bool {
        let mut expiries = self.expiries.lock().await;
        match expiries.get(key) {
            Some(expires_at) if *expires_at > Instant::now() => true,
            Some(_) => {
                expiries.remove(key);
                false
            }
            None => false,
        }
    }
}

#[async_trait::async_trait]
impl HealthStateStore for HealthStoreMemory {
    async fn is_failing(&self, processor: Processor) -> Result<bool> {
        Ok(self.is_live(&failing_key(processor)).await)
    }

    async fn mark_failing(&self, processor: Processor) -> Result<()> {
        let expires_at = Instant::now() + self.ttls.failing;
        self.expiries
            .lock()
            .await
            .insert(failing_key(processor), expires_at);
        Ok(())
    }

    async fn clear_failing(&self, processor: Processor) -> Result<()> {
        self.expiries.lock().await.remove(&failing_key(processor));
        Ok(())
    }

    async fn try_acquire_probe_lock(&self, processor: Processor) -> Result<bool> {
        let key = probe_lock_key(processor);
        let now = Instant::now();
        let mut expiries = self.expiries.lock().await;
        if expiries.get(&key).is_some_and(|expires_at| *expires_at > now) {
            return Ok(false);
        }
        expiries.insert(key, now + self.ttls.probe_lock);
        Ok(true)
    }

    async fn is_probe_locked(&self, processor: Processor) -> Result<bool> {
        Ok(self.is_live(&probe_lock_key(processor)).await)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
