use crate::domain::payment::Processor;
use crate::health::{failing_key, probe_lock_key, HealthStateStore, HealthTtls};
use anyhow::Result;
use redis::AsyncCommands;

#[derive(Clone)]
pub struct HealthStoreRedis {
    pub client: redis::Client,
    pub ttls: HealthTtls,
}

impl HealthStoreRedis {
    pub fn new(redis_url: &str, ttls: HealthTtls) -> Result<Self> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            ttls,
        })
    }
}

#[async_trait::async_trait]
impl HealthStateStore for HealthStoreRedis {
    async fn is_failing(&self, processor: Processor) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let exists: bool = conn.exists(failing_key(processor)).await?;
        Ok(exists)
    }

    async fn mark_failing(&self, processor: Processor) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis::cmd("SET")
            .arg(failing_key(processor))
            .arg(1)
            .arg("PX")
            .arg(self.ttls.failing.as_millis() as u64)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn clear_failing(&self, processor: Processor) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: usize = conn.del(failing_key(processor)).await?;
        Ok(())
    }

    async fn try_acquire_probe_lock(&self, processor: Processor) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let reply: Option<String> = redis::cmd("SET")
            .arg(probe_lock_key(processor))
            .arg(1)
            .arg("NX")
            .arg("PX")
            .arg(self.ttls.probe_lock.as_millis() as u64)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn is_probe_locked(&self, processor: Processor) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let exists: bool = conn.exists(probe_lock_key(processor)).await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
