//! End-to-end integration tests: rendered page → CSV history → webhook

use async_trait::async_trait;
use price_tracker::config::TrackerSettings;
use price_tracker::history::{CsvHistory, HEADER};
use price_tracker::io::{HttpClient, HttpError, HttpResponse};
use price_tracker::monitor::{CycleOutcome, MonitorCycle, Scheduler};
use price_tracker::notify::WebhookNotifier;
use price_tracker::source::{FetchError, PageRenderer, PageSource, PriceExtractor};
use reqwest::Url;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const SELECTOR: &str = "span.a-price > span.a-offscreen";

/// Serves scripted documents; `None` is a page without price markup
struct ScriptedRenderer {
    pages: Mutex<VecDeque<String>>,
}

impl ScriptedRenderer {
    fn new(prices: &[Option<&str>]) -> Self {
        let pages = prices
            .iter()
            .map(|p| match p {
                Some(price) => format!(
                    r#"<html><body><span class="a-price"><span class="a-offscreen">{price}</span></span></body></html>"#
                ),
                None => "<html><body><p>Currently unavailable.</p></body></html>".to_string(),
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
        }
    }
}

#[async_trait]
impl PageRenderer for ScriptedRenderer {
    async fn render(&self, url: &str) -> Result<String, FetchError> {
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| FetchError::Navigation {
                url: url.to_string(),
                reason: "no more pages".to_string(),
            })
    }
}

/// Records webhook posts and answers with a fixed status
struct RecordingHttp {
    status: u16,
    posts: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingHttp {
    fn new(status: u16) -> Self {
        Self {
            status,
            posts: Mutex::new(vec![]),
        }
    }

    fn texts(&self) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body["text"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

#[async_trait]
impl HttpClient for RecordingHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        Err(HttpError::Transport {
            url: url.to_string(),
            reason: "unexpected GET".to_string(),
        })
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));
        Ok(HttpResponse {
            status: self.status,
            body: "ok".to_string(),
        })
    }
}

fn settings(threshold: Decimal) -> TrackerSettings {
    TrackerSettings {
        url: Url::parse("https://shop.example.com/dp/B0TEST").unwrap(),
        baseline: dec!(2000),
        threshold,
        webhook: Url::parse("https://hooks.example.com/services/T/B/X").unwrap(),
        interval: Duration::from_secs(600),
    }
}

fn build_cycle(
    threshold: Decimal,
    pages: &[Option<&str>],
    history_path: &Path,
    http: &Arc<RecordingHttp>,
) -> MonitorCycle {
    let settings = Arc::new(settings(threshold));
    let source = PageSource::new(
        Box::new(ScriptedRenderer::new(pages)),
        PriceExtractor::new(SELECTOR).unwrap(),
    );
    let notifier = WebhookNotifier::new(
        settings.webhook.clone(),
        settings.url.clone(),
        "¥",
        http.clone(),
    );
    MonitorCycle::new(
        settings,
        Arc::new(source),
        Arc::new(CsvHistory::new(history_path, false)),
        Arc::new(notifier),
    )
}

fn data_rows(path: &Path) -> Vec<(String, String)> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(HEADER.to_vec()));
    reader
        .records()
        .map(|r| {
            let r = r.unwrap();
            (r[0].to_string(), r[1].to_string())
        })
        .collect()
}

#[tokio::test]
async fn test_price_drop_is_recorded_and_alerted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let http = Arc::new(RecordingHttp::new(200));

    let cycle = build_cycle(dec!(5.0), &[Some("￥1,850")], &path, &http);
    let outcome = cycle.run().await;

    let result = outcome.result().unwrap();
    assert_eq!(result.price, dec!(1850));
    assert_eq!(result.deviation, dec!(7.5));
    assert!(result.notified && result.delivered);

    let rows = data_rows(&path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, "1850");

    let texts = http.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("7.5%"));
    assert!(texts[0].contains("¥1,850"));
    assert!(texts[0].contains("https://shop.example.com/dp/B0TEST"));
}

#[tokio::test]
async fn test_small_drop_is_recorded_silently() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let http = Arc::new(RecordingHttp::new(200));

    let cycle = build_cycle(dec!(10.0), &[Some("¥1,900")], &path, &http);
    let outcome = cycle.run().await;

    assert_eq!(outcome.result().unwrap().deviation, dec!(5));
    assert_eq!(data_rows(&path).len(), 1);
    assert!(http.texts().is_empty());
}

#[tokio::test]
async fn test_missing_price_element_touches_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let http = Arc::new(RecordingHttp::new(200));

    let cycle = build_cycle(dec!(5.0), &[None], &path, &http);
    let outcome = cycle.run().await;

    assert!(matches!(
        outcome,
        CycleOutcome::FetchFailed(FetchError::ElementNotFound { .. })
    ));
    assert!(!path.exists());
    assert!(http.texts().is_empty());
}

#[tokio::test]
async fn test_rejected_webhook_does_not_abort_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let http = Arc::new(RecordingHttp::new(500));

    let cycle = build_cycle(dec!(5.0), &[Some("¥1,000")], &path, &http);
    let result = cycle.run().await.result().cloned().unwrap();

    assert!(result.notified);
    assert!(!result.delivered);
    assert_eq!(http.texts().len(), 1);
    assert_eq!(data_rows(&path).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_survives_failed_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prices.csv");
    let http = Arc::new(RecordingHttp::new(200));

    let cycle = build_cycle(
        dec!(5.0),
        &[Some("¥1,990"), None, Some("¥1,700")],
        &path,
        &http,
    );
    let scheduler = Scheduler::from_settings(cycle);

    // Cycles at t=0, 600 (fails), 1200
    let cycles = scheduler
        .run_until(tokio::time::sleep(Duration::from_secs(1500)))
        .await;

    assert_eq!(cycles, 3);
    let prices: Vec<String> = data_rows(&path).into_iter().map(|(_, p)| p).collect();
    assert_eq!(prices, vec!["1990", "1700"]);
    assert_eq!(http.texts().len(), 1);
}
