pub mod rules;

use serde::Serialize;

use crate::collector::normalize::round2;
use crate::model::{ClientsInfo, HealthSnapshot, StatsInfo};

// ============================================================
// Core types
// ============================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Caution,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Caution => "caution",
            Severity::Critical => "critical",
        }
    }
}

/// A threshold violation found in a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Warning {
    pub rule_id: &'static str,
    pub severity: Severity,
    pub message: String,
    /// Metric value that triggered the rule, if the rule has one.
    pub value: Option<f64>,
}

// ============================================================
// Derived metrics
// ============================================================

/// Keyspace hit rate in percent, rounded to 2 decimals. 0.0 when there were
/// no lookups at all.
pub fn hit_rate(stats: &StatsInfo) -> f64 {
    let total = stats.keyspace_lookups();
    if total == 0 {
        return 0.0;
    }
    round2(stats.keyspace_hits as f64 / total as f64 * 100.0)
}

/// Connected clients as a percentage of the configured limit. 0.0 when the
/// limit is reported as 0.
pub fn client_saturation(clients: &ClientsInfo) -> f64 {
    if clients.max_clients == 0 {
        return 0.0;
    }
    clients.connected_clients as f64 / clients.max_clients as f64 * 100.0
}

// ============================================================
// Analysis context passed to each rule
// ============================================================

pub struct AnalysisContext<'a> {
    pub snapshot: &'a HealthSnapshot,
    pub hit_rate: f64,
    pub client_saturation: f64,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(snapshot: &'a HealthSnapshot) -> Self {
        Self {
            snapshot,
            hit_rate: hit_rate(&snapshot.stats),
            client_saturation: client_saturation(&snapshot.clients),
        }
    }
}

// ============================================================
// Entry point
// ============================================================

/// Evaluates every rule against `snapshot` and returns the warnings in rule
/// order. Pure: the same snapshot always yields the same list.
pub fn analyze(snapshot: &HealthSnapshot) -> Vec<Warning> {
    let ctx = AnalysisContext::new(snapshot);
    rules::all_rules()
        .iter()
        .filter_map(|rule| rule.evaluate(&ctx))
        .collect()
}
