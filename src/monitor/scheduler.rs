//! Fixed-period cycle scheduler

use super::{CycleOutcome, MonitorCycle};
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Runs a cycle immediately, then once per period, never overlapping
pub struct Scheduler {
    cycle: MonitorCycle,
    period: Duration,
}

impl Scheduler {
    pub fn new(cycle: MonitorCycle, period: Duration) -> Self {
        Self { cycle, period }
    }

    /// Scheduler using the period from the cycle's settings
    pub fn from_settings(cycle: MonitorCycle) -> Self {
        let period = cycle.settings().interval;
        Self::new(cycle, period)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run until `shutdown` resolves, returning the number of cycles run
    ///
    /// Shutdown is only observed between cycles. A cycle that overruns the
    /// period pushes the next one back instead of triggering a catch-up burst.
    pub async fn run_until<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut cycles = 0u64;
        loop {
            tokio::select! {
                // The first tick completes immediately
                _ = ticker.tick() => {}
                _ = &mut shutdown => {
                    tracing::info!(cycles, "Scheduler stopping");
                    break;
                }
            }

            cycles += 1;
            let outcome = self.cycle.run().await;
            tracing::debug!(
                cycle = cycles,
                completed = matches!(outcome, CycleOutcome::Completed(_)),
                next_in_secs = self.period.as_secs(),
                "Cycle finished"
            );
        }

        cycles
    }

    /// Run until the process is terminated
    pub async fn run(&self) {
        self.run_until(std::future::pending::<()>()).await;
    }
}
