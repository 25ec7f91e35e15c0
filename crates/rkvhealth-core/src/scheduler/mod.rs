//! Drives collect → analyze → present cycles.
//!
//! Two run modes:
//! - [`Scheduler::run_once`]: one cycle, collection failures are returned.
//! - [`Scheduler::run_continuous`]: cycles at a fixed interval until a
//!   [`Shutdown`] is triggered. Failed cycles are reported to the presenter
//!   and the loop carries on.
//!
//! Cycles never overlap. The only suspension point is the interval sleep,
//! which observes the shutdown flag.

mod shutdown;

pub use shutdown::{SLEEP_STEP, Shutdown};

use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::analysis::{Warning, analyze};
use crate::collector::{CollectError, Collector, MetricsSource};
use crate::model::HealthSnapshot;

/// Refresh interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Receives the result of every cycle.
pub trait Presenter {
    /// Renders one completed cycle. `warnings` is the analysis result for
    /// `snapshot`, in rule order; empty means every check passed.
    fn present(&mut self, snapshot: &HealthSnapshot, warnings: &[Warning]) -> io::Result<()>;

    /// Renders a cycle whose collection failed. Only called in continuous mode.
    fn unavailable(&mut self, timestamp: i64, error: &CollectError) -> io::Result<()>;
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("failed to render report: {0}")]
    Present(#[from] io::Error),
}

/// Counters returned by [`Scheduler::run_continuous`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
}

pub struct Scheduler<S: MetricsSource, P: Presenter> {
    collector: Collector<S>,
    presenter: P,
    interval: Duration,
}

impl<S: MetricsSource, P: Presenter> Scheduler<S, P> {
    pub fn new(collector: Collector<S>, presenter: P) -> Self {
        Self {
            collector,
            presenter,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Sets the start-to-start interval of continuous mode.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn collector(&self) -> &Collector<S> {
        &self.collector
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Collects and analyzes one snapshot without presenting it.
    pub fn cycle(&mut self) -> Result<HealthSnapshot, CollectError> {
        let snapshot = self.collector.collect()?;
        let warnings = analyze(&snapshot);
        debug!(
            "cycle at {}: {} warning(s)",
            snapshot.timestamp,
            warnings.len()
        );
        Ok(snapshot.with_warnings(warnings))
    }

    /// Runs exactly one cycle and presents it.
    pub fn run_once(&mut self) -> Result<HealthSnapshot, RunError> {
        let snapshot = self.cycle()?;
        self.presenter.present(&snapshot, &snapshot.warnings)?;
        Ok(snapshot)
    }

    /// Runs cycles until `shutdown` is triggered.
    ///
    /// Each cycle starts one interval after the previous one started. A cycle
    /// that takes longer than the interval is followed immediately by the
    /// next one; missed ticks are not made up. Collection failures are handed
    /// to [`Presenter::unavailable`] and do not stop the loop. Only a
    /// presenter failure ends the run with an error.
    pub fn run_continuous(&mut self, shutdown: &Shutdown) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        info!("monitoring every {:?}", self.interval);

        while !shutdown.is_triggered() {
            let started = Instant::now();
            summary.cycles += 1;

            match self.cycle() {
                Ok(snapshot) => {
                    self.presenter.present(&snapshot, &snapshot.warnings)?;
                }
                Err(e) => {
                    summary.failed_cycles += 1;
                    error!("cycle {} failed: {}", summary.cycles, e);
                    self.presenter.unavailable(Utc::now().timestamp(), &e)?;
                }
            }

            let remaining = self.interval.saturating_sub(started.elapsed());
            shutdown.sleep(remaining);
        }

        info!(
            "monitoring stopped after {} cycle(s), {} failed",
            summary.cycles, summary.failed_cycles
        );
        Ok(summary)
    }
}
