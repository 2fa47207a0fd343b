//! Price source module
//!
//! Renders the product page and extracts a single price from it

mod chrome;
mod extract;
mod http;
mod types;

pub use chrome::{ChromeConfig, ChromeRenderer};
pub use extract::{parse_price, PriceExtractor};
pub use http::HttpRenderer;
pub use types::FetchError;

use crate::telemetry::{record_latency, LatencyMetric};
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use std::time::Instant;

/// Trait for page renderers
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Return the fully rendered document for `url`
    async fn render(&self, url: &str) -> Result<String, FetchError>;
}

/// Trait for price source implementations
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price; one attempt, no retries
    async fn fetch(&self, url: &Url) -> Result<Decimal, FetchError>;
}

/// Price source combining a renderer with a fixed selector
pub struct PageSource {
    renderer: Box<dyn PageRenderer>,
    extractor: PriceExtractor,
}

impl PageSource {
    pub fn new(renderer: Box<dyn PageRenderer>, extractor: PriceExtractor) -> Self {
        Self {
            renderer,
            extractor,
        }
    }
}

#[async_trait]
impl PriceSource for PageSource {
    async fn fetch(&self, url: &Url) -> Result<Decimal, FetchError> {
        let started = Instant::now();
        let html = self.renderer.render(url.as_str()).await?;
        let price = self.extractor.extract(&html);
        record_latency(LatencyMetric::PageFetch, started.elapsed());
        price
    }
}
