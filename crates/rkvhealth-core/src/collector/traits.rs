//! Abstraction over the server being inspected.
//!
//! The `MetricsSource` trait lets the collector read from a live server
//! connection or from an in-memory mock for testing.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::model::SlowEntry;

/// Raw `field -> value` pairs of one `INFO` section, exactly as reported.
pub type RawFields = HashMap<String, String>;

/// Metric categories, each backed by one `INFO` section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InfoCategory {
    Server,
    Memory,
    Stats,
    Clients,
    Replication,
    Persistence,
}

impl InfoCategory {
    /// All categories in collection order.
    pub const ALL: [InfoCategory; 6] = [
        InfoCategory::Server,
        InfoCategory::Memory,
        InfoCategory::Stats,
        InfoCategory::Clients,
        InfoCategory::Replication,
        InfoCategory::Persistence,
    ];

    /// Section name passed to `INFO`.
    pub fn section(&self) -> &'static str {
        match self {
            InfoCategory::Server => "server",
            InfoCategory::Memory => "memory",
            InfoCategory::Stats => "stats",
            InfoCategory::Clients => "clients",
            InfoCategory::Replication => "replication",
            InfoCategory::Persistence => "persistence",
        }
    }
}

impl fmt::Display for InfoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// Errors reported by a metrics source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The server could not be reached: refused, dropped, I/O failure or timeout.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The server answered a single query with an error.
    #[error("command failed: {0}")]
    Command(String),

    /// The reply could not be interpreted.
    #[error("unexpected reply: {0}")]
    Protocol(String),
}

impl SourceError {
    /// Returns true if the error means the whole source is unavailable,
    /// as opposed to a single query failing.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SourceError::Unreachable(_))
    }
}

/// Administrative introspection queries against a key-value server.
///
/// Methods take `&mut self` because real implementations own a connection.
pub trait MetricsSource {
    /// Connectivity check.
    fn ping(&mut self) -> Result<(), SourceError>;

    /// Fetches one `INFO` section. Fields the server does not report are
    /// simply absent from the map.
    fn category(&mut self, category: InfoCategory) -> Result<RawFields, SourceError>;

    /// Fetches up to `count` most recent slow log entries, newest first.
    fn slow_entries(&mut self, count: usize) -> Result<Vec<SlowEntry>, SourceError>;
}

impl<S: MetricsSource + ?Sized> MetricsSource for Box<S> {
    fn ping(&mut self) -> Result<(), SourceError> {
        (**self).ping()
    }

    fn category(&mut self, category: InfoCategory) -> Result<RawFields, SourceError> {
        (**self).category(category)
    }

    fn slow_entries(&mut self, count: usize) -> Result<Vec<SlowEntry>, SourceError> {
        (**self).slow_entries(count)
    }
}
