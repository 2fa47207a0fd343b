//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Page render plus price extraction
    PageFetch,
    /// Webhook round trip
    WebhookDelivery,
    /// One whole monitoring cycle
    Cycle,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Most recently observed price
    LastPrice,
    /// Deviation from baseline of the last observation, in percent
    Deviation,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Cycles started
    Cycles,
    /// Fetches that failed (cycle skipped)
    FetchFailures,
    /// History appends that failed
    StorageFailures,
    /// Alerts accepted by the webhook
    AlertsSent,
    /// Alerts that failed to deliver
    DeliveryFailures,
}

fn latency_name(metric: LatencyMetric) -> &'static str {
    match metric {
        LatencyMetric::PageFetch => "price_tracker_page_fetch_latency_ms",
        LatencyMetric::WebhookDelivery => "price_tracker_webhook_latency_ms",
        LatencyMetric::Cycle => "price_tracker_cycle_latency_ms",
    }
}

fn gauge_name(metric: GaugeMetric) -> &'static str {
    match metric {
        GaugeMetric::LastPrice => "price_tracker_last_price",
        GaugeMetric::Deviation => "price_tracker_deviation_pct",
    }
}

fn counter_name(metric: CounterMetric) -> &'static str {
    match metric {
        CounterMetric::Cycles => "price_tracker_cycles_total",
        CounterMetric::FetchFailures => "price_tracker_fetch_failures_total",
        CounterMetric::StorageFailures => "price_tracker_storage_failures_total",
        CounterMetric::AlertsSent => "price_tracker_alerts_sent_total",
        CounterMetric::DeliveryFailures => "price_tracker_delivery_failures_total",
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = latency_name(metric);
    let value_ms = duration.as_secs_f64() * 1000.0;

    metrics::histogram!(metric_name).record(value_ms);
    tracing::debug!(metric = metric_name, value_ms, "Recording latency");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = gauge_name(metric);

    metrics::gauge!(metric_name).set(value);
    tracing::debug!(metric = metric_name, value = value, "Setting gauge");
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(counter_name(metric)).increment(1);
}
