//! Price history module
//!
//! Append-only record of every observed price

mod csv_file;
mod types;

pub use csv_file::{CsvHistory, HEADER};
pub use types::{PriceObservation, StorageError};

/// Trait for history store implementations
///
/// Calls are never concurrent: the scheduler runs one cycle at a time.
pub trait HistoryStore: Send + Sync {
    /// Durably append one observation after all existing ones
    fn append(&self, observation: &PriceObservation) -> Result<(), StorageError>;
}
