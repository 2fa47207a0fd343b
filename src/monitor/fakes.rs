//! In-memory collaborators for cycle and scheduler tests

use crate::config::TrackerSettings;
use crate::history::{HistoryStore, PriceObservation, StorageError};
use crate::io::HttpError;
use crate::notify::{DeliveryError, Notifier};
use crate::source::{FetchError, PriceSource};
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub fn settings(baseline: Decimal, threshold: Decimal) -> TrackerSettings {
    TrackerSettings {
        url: Url::parse("https://shop.example.com/dp/B0TEST").unwrap(),
        baseline,
        threshold,
        webhook: Url::parse("https://hooks.example.com/T/B/X").unwrap(),
        interval: Duration::from_secs(600),
    }
}

/// Replays scripted fetch results, then keeps failing
pub struct FakeSource {
    script: Mutex<VecDeque<Result<Decimal, FetchError>>>,
    fetches: Mutex<usize>,
}

impl FakeSource {
    pub fn new(script: Vec<Result<Decimal, FetchError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fetches: Mutex::new(0),
        }
    }

    pub fn prices(prices: &[Decimal]) -> Self {
        Self::new(prices.iter().copied().map(Ok).collect())
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl PriceSource for FakeSource {
    async fn fetch(&self, url: &Url) -> Result<Decimal, FetchError> {
        *self.fetches.lock().unwrap() += 1;
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FetchError::Navigation {
                    url: url.to_string(),
                    reason: "script exhausted".to_string(),
                })
            })
    }
}

#[derive(Default)]
pub struct FakeHistory {
    rows: Mutex<Vec<PriceObservation>>,
    fail: bool,
}

impl FakeHistory {
    pub fn failing() -> Self {
        Self {
            rows: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn prices(&self) -> Vec<Decimal> {
        self.rows.lock().unwrap().iter().map(|o| o.price).collect()
    }
}

impl HistoryStore for FakeHistory {
    fn append(&self, observation: &PriceObservation) -> Result<(), StorageError> {
        if self.fail {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            )));
        }
        self.rows.lock().unwrap().push(observation.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    calls: Mutex<Vec<(Decimal, Decimal)>>,
    fail: bool,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(vec![]),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(Decimal, Decimal)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, price: Decimal, deviation: Decimal) -> Result<u16, DeliveryError> {
        self.calls.lock().unwrap().push((price, deviation));
        if self.fail {
            return Err(DeliveryError::Transport(HttpError::Timeout {
                url: "https://hooks.example.com/T/B/X".to_string(),
            }));
        }
        Ok(200)
    }
}
