//! Plain HTTP renderer for server-rendered pages

use super::{FetchError, PageRenderer};
use crate::io::{HttpClient, HttpError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Fetches the raw document without executing scripts
pub struct HttpRenderer {
    http: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl HttpRenderer {
    /// `timeout` is the budget the client was built with, used for reporting
    pub fn new(http: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self { http, timeout }
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).await.map_err(|e| match e {
            HttpError::Timeout { url } => FetchError::Timeout {
                url,
                after: self.timeout,
            },
            HttpError::Transport { url, reason } => FetchError::Navigation { url, reason },
        })?;

        if !response.is_success() {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status),
            });
        }

        Ok(response.body)
    }
}
