//! Run command implementation

use crate::config::{Config, RendererKind};
use crate::history::CsvHistory;
use crate::io::ReqwestHttpClient;
use crate::monitor::{MonitorCycle, Scheduler};
use crate::notify::WebhookNotifier;
use crate::source::{
    ChromeConfig, ChromeRenderer, HttpRenderer, PageRenderer, PageSource, PriceExtractor,
};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct RunArgs {}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let scheduler = build_scheduler(config)?;

        tracing::info!(
            period_secs = scheduler.period().as_secs(),
            "Start tracking..."
        );
        scheduler.run_until(shutdown_signal()).await;
        Ok(())
    }
}

/// Wire every component from validated configuration
pub fn build_scheduler(config: &Config) -> anyhow::Result<Scheduler> {
    let settings = Arc::new(config.settings()?);

    let extractor = PriceExtractor::new(&config.source.selector)?;
    let renderer: Box<dyn PageRenderer> = match config.source.renderer {
        RendererKind::Chrome => Box::new(ChromeRenderer::new(ChromeConfig {
            binary: config.source.chrome_path.clone(),
            timeout: config.source.timeout(),
            virtual_time_budget: Duration::from_millis(config.source.virtual_time_budget_ms),
            user_agent: config.source.user_agent.clone(),
        })),
        RendererKind::Http => {
            let http = ReqwestHttpClient::new(
                config.source.timeout(),
                config.source.user_agent.as_deref(),
            )?;
            Box::new(HttpRenderer::new(Arc::new(http), config.source.timeout()))
        }
    };
    let source = PageSource::new(renderer, extractor);

    let history = CsvHistory::new(config.history.path.clone(), config.history.utf8_bom);

    let webhook_http = ReqwestHttpClient::new(config.notify.timeout(), None)?;
    let notifier = WebhookNotifier::new(
        settings.webhook.clone(),
        settings.url.clone(),
        config.notify.currency_symbol.clone(),
        Arc::new(webhook_http),
    );

    tracing::info!(
        url = %settings.url,
        baseline = %settings.baseline,
        threshold_pct = %settings.threshold,
        renderer = ?config.source.renderer,
        selector = %config.source.selector,
        history = %history.path().display(),
        "Tracker configured"
    );

    let cycle = MonitorCycle::new(
        settings,
        Arc::new(source),
        Arc::new(history),
        Arc::new(notifier),
    );
    Ok(Scheduler::from_settings(cycle))
}

/// Resolves on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
