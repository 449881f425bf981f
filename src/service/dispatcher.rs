use crate::domain::payment::{PaymentRecord, Processor, ProcessorPaymentRequest};
use crate::health::HealthStateStore;
use crate::processors::{ForwardStatus, ProcessorClient};
use crate::repo::payments_repo::PaymentStore;
use crate::router::selector::ProcessorSelector;
use chrono::SubsecRound;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchJob {
    pub correlation_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Recorded(Processor),
    Duplicate(Processor),
    Dropped(Processor, ForwardStatus),
    StoreWriteFailed(Processor),
}

/// Runs one payment end to end: select, forward once, then record or flag.
/// A failed forward is never retried.
#[derive(Clone)]
pub struct PaymentForwarder {
    pub selector: ProcessorSelector,
    pub client: Arc<dyn ProcessorClient>,
    pub health_store: Arc<dyn HealthStateStore>,
    pub payment_store: Arc<dyn PaymentStore>,
    pub forward_timeout: Duration,
}

impl PaymentForwarder {
    pub async fn forward(&self, job: DispatchJob) -> DispatchOutcome {
        let processor = self.selector.choose().await;
        // millisecond precision, the same instant the processor is sent
        let requested_at = chrono::Utc::now().trunc_subsecs(3);
        let payload = ProcessorPaymentRequest::new(&job.correlation_id, job.amount, requested_at);

        let status = match tokio::time::timeout(
            self.forward_timeout,
            self.client.forward(processor, &payload),
        )
        .await
        {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => ForwardStatus::Unreachable(format!("{:#}", e)),
            Err(_) => ForwardStatus::Timeout,
        };

        if !status.is_accepted() {
            if let Err(e) = self.health_store.mark_failing(processor).await {
                tracing::error!("could not mark {} failing: {:#}", processor, e);
            }
            tracing::warn!(
                "dropping payment {} after {} failed: {:?}",
                job.correlation_id,
                processor,
                status
            );
            return DispatchOutcome::Dropped(processor, status);
        }

        let record = PaymentRecord {
            correlation_id: job.correlation_id,
            amount: job.amount,
            processor,
            requested_at,
        };

        match self.payment_store.append(&record).await {
            Ok(true) => {
                tracing::debug!("payment {} recorded via {}", record.correlation_id, processor);
                DispatchOutcome::Recorded(processor)
            }
            Ok(false) => {
                tracing::info!("payment {} already recorded, ignoring duplicate", record.correlation_id);
                DispatchOutcome::Duplicate(processor)
            }
            Err(e) => {
                tracing::error!(
                    "payment {} accepted by {} but not recorded: {:#}",
                    record.correlation_id,
                    processor,
                    e
                );
                DispatchOutcome::StoreWriteFailed(processor)
            }
        }
    }
}

/// Intake handle. Cloning is cheap; the queue closes once every clone is
/// dropped.
#[derive(Clone)]
pub struct PaymentDispatcher {
    sender: mpsc::UnboundedSender<DispatchJob>,
}

pub struct DispatchWorkers {
    handle: JoinHandle<()>,
}

impl PaymentDispatcher {
    /// Starts the admission loop. Jobs leave the queue in submission order and
    /// at most `workers` forwards run at once.
    pub fn spawn(forwarder: PaymentForwarder, workers: usize) -> (Self, DispatchWorkers) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<DispatchJob>();
        let limit = u32::try_from(workers.clamp(1, Semaphore::MAX_PERMITS)).unwrap_or(u32::MAX);
        let permits = Arc::new(Semaphore::new(limit as usize));

        let handle = tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let Ok(permit) = permits.clone().acquire_owned().await else {
                    break;
                };
                let forwarder = forwarder.clone();
                tokio::spawn(async move {
                    forwarder.forward(job).await;
                    drop(permit);
                });
            }

            // every permit back means every in-flight forward has finished
            if permits.acquire_many(limit).await.is_err() {
                tracing::error!("dispatch permits closed before drain");
            }
        });

        (Self { sender }, DispatchWorkers { handle })
    }

    /// Queues the payment and returns at once.
    pub fn dispatch(&self, correlation_id: String, amount: Decimal) {
        let job = DispatchJob {
            correlation_id,
            amount,
        };
        if let Err(e) = self.sender.send(job) {
            tracing::error!("dispatch queue closed, payment {} lost", e.0.correlation_id);
        }
    }
}

impl DispatchWorkers {
    /// Waits for the queue to drain. Only returns after every
    /// `PaymentDispatcher` clone has been dropped.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!("dispatch loop ended abnormally: {}", e);
        }
    }
}
