//! Price source types

use std::time::Duration;
use thiserror::Error;

/// Why a page did not yield a price; each one skips a single cycle
#[derive(Debug, Error)]
pub enum FetchError {
    /// Page could not be loaded (DNS, connection refused, bad status, renderer crash)
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    /// Page load exceeded its time budget
    #[error("Loading {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },
    /// Rendered document has no element matching the price selector
    #[error("Price element not found (selector `{selector}`)")]
    ElementNotFound { selector: String },
    /// Element text does not hold a positive number
    #[error("Price text {text:?} is not a valid price")]
    Unparseable { text: String },
}
