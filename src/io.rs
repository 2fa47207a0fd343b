//! HTTP client abstraction for testability

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures (no response received)
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request to the given URL
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError>;

    /// Send a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError>;
}

/// Production HTTP client using reqwest
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Build a client whose every request is bounded by `timeout`
    pub fn new(timeout: Duration, user_agent: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;
        Ok(Self { client })
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<HttpResponse, HttpError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(url, e))?;
        Ok(HttpResponse { status, body })
    }
}

/// Reduce a URL to scheme and host; webhook paths carry credentials
pub fn redact_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}/***",
            parsed.scheme(),
            parsed.host_str().unwrap_or("?")
        ),
        Err(_) => "<invalid url>".to_string(),
    }
}

/// `url` is what the error reports; reqwest's own copy is stripped
fn transport_error(url: &str, e: reqwest::Error) -> HttpError {
    let e = e.without_url();
    if e.is_timeout() {
        HttpError::Timeout {
            url: url.to_string(),
        }
    } else {
        HttpError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let response = Self::read(url, response).await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, response.status, response.body.len());
        Ok(response)
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let shown = redact_url(url);
        tracing::debug!("POST {}", shown);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(&shown, e))?;

        let response = Self::read(&shown, response).await?;
        tracing::debug!("POST {} -> {}", shown, response.status);
        Ok(response)
    }
}
