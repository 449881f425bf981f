use crate::domain::payment::{PaymentRecord, Processor};
use crate::domain::summary::{PaymentsSummary, SummaryRange};
use crate::repo::payments_repo::PaymentStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Ledger {
    by_time: BTreeMap<DateTime<Utc>, Vec<(Processor, Decimal)>>,
    correlation_ids: HashSet<String>,
}

/// Payments indexed by `requested_at`, aggregated in process.
#[derive(Clone, Default)]
pub struct PaymentsMemoryStore {
    inner: Arc<RwLock<Ledger>>,
}

impl PaymentsMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.correlation_ids.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl PaymentStore for PaymentsMemoryStore {
    async fn append(&self, record: &PaymentRecord) -> Result<bool> {
        let mut ledger = self.inner.write().await;
        if !ledger.correlation_ids.insert(record.correlation_id.clone()) {
            return Ok(false);
        }
        ledger
            .by_time
            .entry(record.requested_at)
            .or_default()
            .push((record.processor, record.amount));
        Ok(true)
    }

    async fn summarize(&self, range: &SummaryRange) -> Result<PaymentsSummary> {
        let mut summary = PaymentsSummary::default();
        if range.is_empty() {
            return Ok(summary);
        }

        let lower = range.from.map_or(Bound::Unbounded, Bound::Included);
        let upper = range.to.map_or(Bound::Unbounded, Bound::Included);

        let ledger = self.inner.read().await;
        for entries in ledger.by_time.range((lower, upper)).map(|(_, v)| v) {
            for (processor, amount) in entries {
                summary.add(*processor, *amount);
            }
        }
        Ok(summary)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
