//! price-tracker: watches a single product page and alerts on price drops
//!
//! This library provides the core components for:
//! - Rendering the product page and extracting its price
//! - Appending every observed price to a CSV history
//! - Posting a webhook alert when the price falls past a threshold
//! - Running the monitoring cycle on a fixed, non-overlapping schedule
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod history;
pub mod io;
pub mod monitor;
pub mod notify;
pub mod source;
pub mod telemetry;
