//! Slack-compatible incoming webhook notifier

use super::{format_alert, DeliveryError, Notifier};
use crate::io::HttpClient;
use crate::telemetry::{record_latency, LatencyMetric};
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Posts `{"text": ...}` to a webhook endpoint
pub struct WebhookNotifier {
    endpoint: Url,
    product_url: Url,
    currency: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for WebhookNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The endpoint path is a credential
        f.debug_struct("WebhookNotifier")
            .field("host", &self.endpoint.host_str())
            .field("product_url", &self.product_url.as_str())
            .finish()
    }
}

impl WebhookNotifier {
    pub fn new(
        endpoint: Url,
        product_url: Url,
        currency: impl Into<String>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            endpoint,
            product_url,
            currency: currency.into(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, price: Decimal, deviation: Decimal) -> Result<u16, DeliveryError> {
        let text = format_alert(price, deviation, &self.currency, self.product_url.as_str());
        let payload = json!({ "text": text });

        tracing::debug!(host = ?self.endpoint.host_str(), "Sending webhook alert");

        let started = Instant::now();
        let response = self.http.post_json(self.endpoint.as_str(), &payload).await;
        record_latency(LatencyMetric::WebhookDelivery, started.elapsed());
        let response = response?;

        if !response.is_success() {
            return Err(DeliveryError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        Ok(response.status)
    }
}
