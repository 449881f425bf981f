use crate::domain::payment::Processor;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inclusive time bounds; a missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct SummaryRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SummaryRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn is_empty(&self) -> bool {
        matches!((self.from, self.to), (Some(from), Some(to)) if from > to)
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| ts >= from) && self.to.map_or(true, |to| ts <= to)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ProcessorTotals {
    #[serde(rename = "totalRequests")]
    pub total_requests: u64,
    #[serde(rename = "totalAmount", with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PaymentsSummary {
    pub default: ProcessorTotals,
    pub fallback: ProcessorTotals,
}

impl PaymentsSummary {
    pub fn totals(&self, processor: Processor) -> &ProcessorTotals {
        match processor {
            Processor::Default => &self.default,
            Processor::Fallback => &self.fallback,
        }
    }

    pub fn totals_mut(&mut self, processor: Processor) -> &mut ProcessorTotals {
        match processor {
            Processor::Default => &mut self.default,
            Processor::Fallback => &mut self.fallback,
        }
    }

    pub fn add(&mut self, processor: Processor, amount: Decimal) {
        let totals = self.totals_mut(processor);
        totals.total_requests += 1;
        totals.total_amount += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn range_bounds_are_inclusive() {
        let t1 = Utc.timestamp_opt(1_700_000_000, 0).single().unwrap();
        let t2 = Utc.timestamp_opt(1_700_000_010, 0).single().unwrap();
        let range = SummaryRange::new(Some(t1), Some(t2));
        assert!(range.contains(t1));
        assert!(range.contains(t2));
        assert!(!range.contains(t2 + chrono::Duration::milliseconds(1)));
        assert!(SummaryRange::default().contains(t1));
        assert!(SummaryRange::new(Some(t2), Some(t1)).is_empty());
    }

    #[test]
    fn serializes_with_camel_case_numbers() {
        let mut summary = PaymentsSummary::default();
        summary.add(Processor::Fallback, Decimal::new(550, 2));
        let v = serde_json::to_value(summary).unwrap();
        assert_eq!(v["fallback"]["totalRequests"], 1);
        assert_eq!(v["fallback"]["totalAmount"].as_f64(), Some(5.5));
        assert_eq!(v["default"]["totalRequests"], 0);
    }
}
