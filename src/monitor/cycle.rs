//! A single monitoring cycle

use super::{deviation, should_notify};
use crate::config::TrackerSettings;
use crate::history::{HistoryStore, PriceObservation, StorageError};
use crate::notify::Notifier;
use crate::source::{FetchError, PriceSource};
use crate::telemetry::{
    increment, record_latency, set_gauge, CounterMetric, GaugeMetric, LatencyMetric,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

/// What a completed cycle observed
#[derive(Debug, Clone, PartialEq)]
pub struct CycleResult {
    pub price: Decimal,
    pub deviation: Decimal,
    /// The notifier was invoked
    pub notified: bool,
    /// The notifier reported success
    pub delivered: bool,
}

/// Terminal state of one cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// No price this time; nothing was recorded or sent
    FetchFailed(FetchError),
    /// Price observed but not recorded; evaluation skipped
    PersistFailed { price: Decimal, error: StorageError },
    /// Price recorded and evaluated
    Completed(CycleResult),
}

impl CycleOutcome {
    pub fn result(&self) -> Option<&CycleResult> {
        match self {
            CycleOutcome::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn price(&self) -> Option<Decimal> {
        match self {
            CycleOutcome::FetchFailed(_) => None,
            CycleOutcome::PersistFailed { price, .. } => Some(*price),
            CycleOutcome::Completed(result) => Some(result.price),
        }
    }
}

/// Fetch → persist → evaluate → (notify), with failures isolated per cycle
pub struct MonitorCycle {
    settings: Arc<TrackerSettings>,
    source: Arc<dyn PriceSource>,
    history: Arc<dyn HistoryStore>,
    notifier: Arc<dyn Notifier>,
}

impl MonitorCycle {
    pub fn new(
        settings: Arc<TrackerSettings>,
        source: Arc<dyn PriceSource>,
        history: Arc<dyn HistoryStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            source,
            history,
            notifier,
        }
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Run one cycle to completion; never fails, the outcome says how it ended
    pub async fn run(&self) -> CycleOutcome {
        let started = Instant::now();
        increment(CounterMetric::Cycles);

        let outcome = self.execute().await;

        record_latency(LatencyMetric::Cycle, started.elapsed());
        outcome
    }

    async fn execute(&self) -> CycleOutcome {
        let baseline = self.settings.baseline;

        let price = match self.source.fetch(&self.settings.url).await {
            Ok(price) => price,
            Err(error) => {
                increment(CounterMetric::FetchFailures);
                tracing::error!(
                    error = %error,
                    url = %self.settings.url,
                    %baseline,
                    "Price fetch failed, skipping cycle"
                );
                return CycleOutcome::FetchFailed(error);
            }
        };

        if let Err(error) = self.history.append(&PriceObservation::now(price)) {
            increment(CounterMetric::StorageFailures);
            tracing::error!(
                error = %error,
                %price,
                %baseline,
                "Failed to record price, skipping evaluation"
            );
            return CycleOutcome::PersistFailed { price, error };
        }

        let deviation = deviation(price, baseline);
        set_gauge(GaugeMetric::LastPrice, price.to_f64().unwrap_or_default());
        set_gauge(GaugeMetric::Deviation, deviation.to_f64().unwrap_or_default());

        let (notified, delivered) = if should_notify(deviation, self.settings.threshold) {
            (true, self.send_alert(price, deviation).await)
        } else {
            (false, false)
        };

        tracing::info!(
            %price,
            %baseline,
            deviation_pct = %deviation.round_dp(2),
            threshold_pct = %self.settings.threshold,
            notified,
            "Price checked"
        );

        CycleOutcome::Completed(CycleResult {
            price,
            deviation,
            notified,
            delivered,
        })
    }

    async fn send_alert(&self, price: Decimal, deviation: Decimal) -> bool {
        match self.notifier.notify(price, deviation).await {
            Ok(status) => {
                increment(CounterMetric::AlertsSent);
                tracing::info!(status, %price, "Price drop alert sent");
                true
            }
            Err(error) => {
                increment(CounterMetric::DeliveryFailures);
                tracing::warn!(error = %error, %price, "Price drop alert not delivered");
                false
            }
        }
    }
}
