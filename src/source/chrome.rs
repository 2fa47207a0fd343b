//! Headless Chromium renderer
//!
//! Runs `chromium --headless --dump-dom <url>` so that client-side scripts get
//! to produce the price markup before the DOM is serialised to stdout.

use super::{FetchError, PageRenderer};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

/// Configuration for the Chromium renderer
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Executable name or path
    pub binary: String,
    /// Hard limit on one render, after which the browser is killed
    pub timeout: Duration,
    /// Virtual time granted to page scripts before the DOM dump
    pub virtual_time_budget: Duration,
    pub user_agent: Option<String>,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            binary: "chromium".to_string(),
            timeout: Duration::from_secs(60),
            virtual_time_budget: Duration::from_millis(5000),
            user_agent: None,
        }
    }
}

/// Renders pages in a short-lived headless Chromium process
pub struct ChromeRenderer {
    config: ChromeConfig,
}

impl ChromeRenderer {
    pub fn new(config: ChromeConfig) -> Self {
        Self { config }
    }

    fn build_args(&self, url: &str) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--hide-scrollbars".to_string(),
            format!(
                "--virtual-time-budget={}",
                self.config.virtual_time_budget.as_millis()
            ),
        ];
        if let Some(agent) = &self.config.user_agent {
            args.push(format!("--user-agent={}", agent));
        }
        args.push("--dump-dom".to_string());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn render(&self, url: &str) -> Result<String, FetchError> {
        let navigation = |reason: String| FetchError::Navigation {
            url: url.to_string(),
            reason,
        };

        let mut child = Command::new(&self.config.binary)
            .args(self.build_args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Backstop for cancellation of this future
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| navigation(format!("failed to launch {}: {}", self.config.binary, e)))?;

        tracing::debug!(url, pid = ?child.id(), "Chromium render started");

        let collected = tokio::time::timeout(self.config.timeout, collect(&mut child)).await;
        let output = match collected {
            Ok(output) => output.map_err(|e| navigation(format!("waiting for browser: {}", e)))?,
            Err(_) => {
                // Kill and reap before reporting
                if let Err(e) = child.kill().await {
                    tracing::warn!(url, error = %e, "Failed to kill timed out browser");
                }
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    after: self.config.timeout,
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(navigation(format!(
                "browser exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(navigation("browser returned an empty document".to_string()));
        }

        tracing::debug!(url, bytes = html.len(), "Chromium render finished");
        Ok(html)
    }
}

struct BrowserOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Drain both pipes while waiting, so a large DOM cannot block the browser
async fn collect(child: &mut Child) -> std::io::Result<BrowserOutput> {
    async fn drain(pipe: Option<impl AsyncRead + Unpin>) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf).await?;
        }
        Ok(buf)
    }

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (stdout, stderr, status) = tokio::try_join!(drain(stdout), drain(stderr), child.wait())?;
    Ok(BrowserOutput {
        status,
        stdout,
        stderr,
    })
}
