//! Notification types

use crate::io::HttpError;
use thiserror::Error;

/// Alert delivery errors; logged, never retried
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// No response from the endpoint
    #[error("Webhook unreachable: {0}")]
    Transport(#[from] HttpError),
    /// Endpoint answered with a non-success status
    #[error("Webhook returned status {status}: {body}")]
    Rejected { status: u16, body: String },
}
