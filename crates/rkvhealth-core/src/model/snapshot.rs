//! Point-in-time capture of every metric category.

use serde::Serialize;

use super::info::{
    ClientsInfo, MemoryInfo, PersistenceInfo, ReplicationInfo, ServerInfo, SlowEntry, StatsInfo,
};
use crate::analysis::Warning;

/// Everything collected in one cycle plus the warnings derived from it.
///
/// Built once by the collector with an empty warning list, then completed by
/// [`HealthSnapshot::with_warnings`]. Nothing is shared between cycles.
#[derive(Clone, Serialize, Debug, PartialEq, Default)]
pub struct HealthSnapshot {
    /// Unix timestamp (seconds) when collection started.
    pub timestamp: i64,
    pub server: ServerInfo,
    pub memory: MemoryInfo,
    pub stats: StatsInfo,
    pub clients: ClientsInfo,
    pub replication: ReplicationInfo,
    pub persistence: PersistenceInfo,
    /// Most recent slow operations, newest first. Empty if the slow log
    /// could not be read.
    pub slow_log: Vec<SlowEntry>,
    /// Warnings in rule order. Empty means every check passed.
    pub warnings: Vec<Warning>,
}

impl HealthSnapshot {
    /// Attaches the analysis result, consuming the collected snapshot.
    pub fn with_warnings(mut self, warnings: Vec<Warning>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_all_clear(&self) -> bool {
        self.warnings.is_empty()
    }
}
