//! Collector that turns one round of source queries into a `HealthSnapshot`.
//!
//! Individual categories are isolated: a category query that fails with a
//! server-side error is logged and replaced by defaults. Only an unreachable
//! source aborts the collection.

use std::time::{Duration, Instant};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use super::normalize;
use super::traits::{InfoCategory, MetricsSource, RawFields, SourceError};
use crate::model::{HealthSnapshot, SlowEntry};

/// Number of slow log entries requested per cycle.
pub const DEFAULT_SLOW_LOG_COUNT: usize = 5;

/// Error returned when a snapshot cannot be collected at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollectError {
    /// The source became unreachable while reading `category`.
    #[error("cannot read {category} metrics: {source}")]
    Connectivity {
        category: InfoCategory,
        source: SourceError,
    },
}

/// Timing information for each collection phase.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    pub total: Duration,
    /// Per-category query time in collection order.
    pub categories: Vec<(InfoCategory, Duration)>,
    pub slow_log: Duration,
}

impl CollectorTiming {
    pub fn category(&self, category: InfoCategory) -> Option<Duration> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, d)| *d)
    }
}

/// Gathers every metric category from a [`MetricsSource`].
pub struct Collector<S: MetricsSource> {
    source: S,
    slow_log_count: usize,
    last_timing: Option<CollectorTiming>,
}

impl<S: MetricsSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slow_log_count: DEFAULT_SLOW_LOG_COUNT,
            last_timing: None,
        }
    }

    /// Sets how many slow log entries to request.
    pub fn with_slow_log_count(mut self, count: usize) -> Self {
        self.slow_log_count = count;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Checks that the source answers.
    pub fn ping(&mut self) -> Result<(), SourceError> {
        self.source.ping()
    }

    /// Returns timing information from the last `collect` call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Collects a complete snapshot.
    ///
    /// Categories are read sequentially and normalized only after all of them
    /// were fetched, so the snapshot reflects a single collection pass. The
    /// returned snapshot carries no warnings yet.
    pub fn collect(&mut self) -> Result<HealthSnapshot, CollectError> {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let timestamp = Utc::now().timestamp();

        let server = self.fetch(InfoCategory::Server, &mut timing)?;
        let memory = self.fetch(InfoCategory::Memory, &mut timing)?;
        let stats = self.fetch(InfoCategory::Stats, &mut timing)?;
        let clients = self.fetch(InfoCategory::Clients, &mut timing)?;
        let replication = self.fetch(InfoCategory::Replication, &mut timing)?;
        let persistence = self.fetch(InfoCategory::Persistence, &mut timing)?;

        let start = Instant::now();
        let slow_log = self.collect_slow_log();
        timing.slow_log = start.elapsed();

        let snapshot = HealthSnapshot {
            timestamp,
            server: normalize::server_info(&server),
            memory: normalize::memory_info(&memory, &stats),
            stats: normalize::stats_info(&stats),
            clients: normalize::clients_info(&clients),
            replication: normalize::replication_info(&replication),
            persistence: normalize::persistence_info(&persistence),
            slow_log,
            warnings: Vec::new(),
        };

        timing.total = total_start.elapsed();
        debug!(
            "collected snapshot in {:?} (slow log {:?})",
            timing.total, timing.slow_log
        );
        self.last_timing = Some(timing);

        Ok(snapshot)
    }

    fn fetch(
        &mut self,
        category: InfoCategory,
        timing: &mut CollectorTiming,
    ) -> Result<RawFields, CollectError> {
        let start = Instant::now();
        let result = self.source.category(category);
        timing.categories.push((category, start.elapsed()));

        match result {
            Ok(fields) => Ok(fields),
            Err(source) if source.is_connectivity() => {
                Err(CollectError::Connectivity { category, source })
            }
            Err(e) => {
                warn!("INFO {} unavailable, using defaults: {}", category, e);
                Ok(RawFields::new())
            }
        }
    }

    /// Slow log failures of any kind degrade to an empty list.
    fn collect_slow_log(&mut self) -> Vec<SlowEntry> {
        match self.source.slow_entries(self.slow_log_count) {
            Ok(mut entries) => {
                entries.truncate(self.slow_log_count);
                entries
            }
            Err(e) => {
                warn!("slow log unavailable: {}", e);
                Vec::new()
            }
        }
    }
}
