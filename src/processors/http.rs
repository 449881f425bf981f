use crate::domain::payment::{Processor, ProcessorPaymentRequest};
use crate::processors::{ForwardStatus, HealthReport, ProcessorClient};
use anyhow::{Context, Result};

pub struct HttpProcessorClient {
    pub default_base_url: String,
    pub fallback_base_url: String,
    pub client: reqwest::Client,
}

impl HttpProcessorClient {
    pub fn new(default_base_url: &str, fallback_base_url: &str, client: reqwest::Client) -> Self {
        Self {
            default_base_url: default_base_url.trim_end_matches('/').to_string(),
            fallback_base_url: fallback_base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn base_url(&self, processor: Processor) -> &str {
        match processor {
            Processor::Default => &self.default_base_url,
            Processor::Fallback => &self.fallback_base_url,
        }
    }
}

#[async_trait::async_trait]
impl ProcessorClient for HttpProcessorClient {
    async fn forward(
        &self,
        processor: Processor,
        payment: &ProcessorPaymentRequest,
    ) -> Result<ForwardStatus> {
        let url = format!("{}/payments", self.base_url(processor));
        let resp = self.client.post(url).json(payment).send().await;

        let status = match resp {
            Ok(r) if r.status().is_success() => ForwardStatus::Accepted,
            Ok(r) => {
                let status = r.status();
                let body = r.text().await.unwrap_or_default();
                tracing::debug!(
                    "{} rejected payment {}: HTTP {} {}",
                    processor,
                    payment.correlation_id,
                    status.as_u16(),
                    body.chars().take(200).collect::<String>()
                );
                ForwardStatus::Rejected(status.as_u16())
            }
            Err(e) if e.is_timeout() => ForwardStatus::Timeout,
            Err(e) => ForwardStatus::Unreachable(e.to_string()),
        };

        Ok(status)
    }

    async fn health(&self, processor: Processor) -> Result<HealthReport> {
        let url = format!("{}/payments/service-health", self.base_url(processor));
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("health request to {} failed", processor))?;

        if !resp.status().is_success() {
            anyhow::bail!("{} health returned HTTP {}", processor, resp.status().as_u16());
        }

        let report = resp
            .json::<HealthReport>()
            .await
            .with_context(|| format!("malformed health body from {}", processor))?;
        Ok(report)
    }
}
