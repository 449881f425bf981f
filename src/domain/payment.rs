use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Processor {
    Default,
    Fallback,
}

impl Processor {
    pub const ALL: [Processor; 2] = [Processor::Default, Processor::Fallback];

    pub fn as_str(&self) -> &'static str {
        match self {
            Processor::Default => "default",
            Processor::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Processor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Processor::Default),
            "fallback" => Ok(Processor::Fallback),
            other => anyhow::bail!("unknown processor '{}'", other),
        }
    }
}

/// A payment that a processor accepted. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub correlation_id: String,
    pub amount: Decimal,
    pub processor: Processor,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakePaymentRequest {
    #[serde(rename = "correlationId")]
    pub correlation_id: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPayment {
    pub correlation_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: &'static str,
}

/// Largest amount the `payments.amount NUMERIC(12, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

impl IntakePaymentRequest {
    pub fn validate(self) -> Result<ValidatedPayment, ValidationError> {
        let correlation_id = match self.correlation_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(ValidationError {
                    code: "MISSING_CORRELATION_ID",
                    message: "correlationId is required",
                })
            }
        };

        let Some(amount) = self.amount else {
            return Err(ValidationError {
                code: "MISSING_AMOUNT",
                message: "amount is required",
            });
        };

        if amount <= Decimal::ZERO || amount.normalize().scale() > 2 {
            return Err(ValidationError {
                code: "INVALID_AMOUNT",
                message: "amount must be positive with at most two decimal places",
            });
        }
        if amount > MAX_AMOUNT {
            return Err(ValidationError {
                code: "INVALID_AMOUNT",
                message: "amount must not exceed 9999999999.99",
            });
        }

        Ok(ValidatedPayment {
            correlation_id,
            amount,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessorPaymentRequest {
    #[serde(rename = "correlationId")]
    pub correlation_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "requestedAt")]
    pub requested_at: String,
}

impl ProcessorPaymentRequest {
    pub fn new(correlation_id: &str, amount: Decimal, requested_at: DateTime<Utc>) -> Self {
        Self {
            correlation_id: correlation_id.to_string(),
            amount,
            requested_at: requested_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

pub fn err(code: &str, message: &str) -> ErrorEnvelope {
    ErrorEnvelope {
        error: ErrorPayload {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
        },
    }
}

impl ErrorEnvelope {
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.error.details = Some(details.into());
        self
    }
}
