//! Notification module
//!
//! Best-effort price drop alerts

mod message;
mod types;
mod webhook;

pub use message::{format_alert, format_price};
pub use types::DeliveryError;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Trait for sending price drop alerts
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert; returns the endpoint's status code on success
    async fn notify(&self, price: Decimal, deviation: Decimal) -> Result<u16, DeliveryError>;
}
