use crate::domain::payment::{PaymentRecord, Processor};
use crate::domain::summary::{PaymentsSummary, SummaryRange};
use anyhow::Result;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

#[async_trait::async_trait]
pub trait PaymentStore: Send + Sync {
    /// Returns `false` when the correlation id is already recorded; the
    /// existing record is kept as-is.
    async fn append(&self, record: &PaymentRecord) -> Result<bool>;

    async fn summarize(&self, range: &SummaryRange) -> Result<PaymentsSummary>;

    async fn ping(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct PgPaymentsRepo {
    pub pool: PgPool,
}

#[async_trait::async_trait]
impl PaymentStore for PgPaymentsRepo {
    async fn append(&self, record: &PaymentRecord) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO payments (correlation_id, amount, processor, requested_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (correlation_id) DO NOTHING
            "#,
        )
        .bind(&record.correlation_id)
        .bind(record.amount)
        .bind(record.processor.as_str())
        .bind(record.requested_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn summarize(&self, range: &SummaryRange) -> Result<PaymentsSummary> {
        let rows = sqlx::query(
            r#"
            SELECT processor, COUNT(*) AS total_requests, COALESCE(SUM(amount), 0) AS total_amount
            FROM payments
            WHERE ($1::timestamptz IS NULL OR requested_at >= $1)
              AND ($2::timestamptz IS NULL OR requested_at <= $2)
            GROUP BY processor
            "#,
        )
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        let mut summary = PaymentsSummary::default();
        for r in rows {
            let processor: Processor = r.get::<String, _>("processor").parse()?;
            let totals = summary.totals_mut(processor);
            totals.total_requests = r.get::<i64, _>("total_requests") as u64;
            totals.total_amount = r.get::<Decimal, _>("total_amount");
        }
        Ok(summary)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
