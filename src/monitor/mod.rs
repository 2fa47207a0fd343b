//! Monitoring module
//!
//! One cycle is fetch → persist → evaluate → (notify); the scheduler runs
//! cycles back to back on a fixed period.

mod cycle;
#[cfg(test)]
mod fakes;
mod scheduler;

pub use cycle::{CycleOutcome, CycleResult, MonitorCycle};
pub use scheduler::Scheduler;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Percentage drop of `price` below `baseline`; positive means cheaper
///
/// `baseline` is validated positive at startup.
pub fn deviation(price: Decimal, baseline: Decimal) -> Decimal {
    dec!(-100) * (price - baseline) / baseline
}

/// Alert when the drop reaches the threshold, boundary included
pub fn should_notify(deviation: Decimal, threshold: Decimal) -> bool {
    deviation >= threshold
}
