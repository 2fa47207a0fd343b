//! Price history types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One observed price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Wall-clock time of the observation
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

impl PriceObservation {
    /// Observation stamped with the current time
    pub fn now(price: Decimal) -> Self {
        Self {
            timestamp: Utc::now(),
            price,
        }
    }
}

/// History storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("History file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("History CSV write failed: {0}")]
    Csv(#[from] csv::Error),
}
