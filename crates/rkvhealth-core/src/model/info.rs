//! Per-category metrics normalized from `INFO <section>` replies.
//!
//! Each structure is built independently by the collector. A field the
//! server did not report resolves to the default documented on it, so a
//! partially populated section still yields a complete value.

use serde::{Deserialize, Serialize};

/// Server identity and uptime.
///
/// Source: `INFO server`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ServerInfo {
    /// Server version string.
    /// Source: `redis_version` (default: "Unknown")
    pub version: String,

    /// Host operating system as reported by the server.
    /// Source: `os` (default: "Unknown")
    pub os: String,

    /// Source: `uptime_in_days` (default: 0)
    pub uptime_days: u64,

    /// Source: `uptime_in_seconds` (default: 0)
    pub uptime_seconds: u64,
}

/// Memory usage and eviction counters.
///
/// Source: `INFO memory`, except `evicted_keys` which the server reports
/// under `INFO stats`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MemoryInfo {
    /// Used memory in MiB, rounded to 2 decimals.
    /// Source: `used_memory` (bytes, default: 0)
    pub used_memory_mb: f64,

    /// Server-formatted used memory, e.g. "1.04M".
    /// Source: `used_memory_human` (default: "N/A")
    pub used_memory_human: String,

    /// Configured memory limit in MiB. `None` means unbounded.
    /// Source: `maxmemory` (bytes, 0 means no limit)
    pub max_memory_mb: Option<f64>,

    /// RSS / used memory ratio, rounded to 2 decimals.
    /// Source: `mem_fragmentation_ratio` (default: 0.0)
    pub fragmentation_ratio: f64,

    /// Keys evicted because of the memory limit.
    /// Source: `evicted_keys` (default: 0)
    pub evicted_keys: u64,
}

/// Throughput and keyspace counters.
///
/// Source: `INFO stats`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct StatsInfo {
    /// Source: `total_connections_received`
    pub total_connections: u64,
    /// Source: `total_commands_processed`
    pub total_commands: u64,
    /// Source: `instantaneous_ops_per_sec`
    pub ops_per_sec: f64,
    /// Source: `rejected_connections`
    pub rejected_connections: u64,
    /// Source: `keyspace_hits`
    pub keyspace_hits: u64,
    /// Source: `keyspace_misses`
    pub keyspace_misses: u64,
}

impl StatsInfo {
    /// Total keyspace lookups (hits + misses).
    pub fn keyspace_lookups(&self) -> u64 {
        self.keyspace_hits.saturating_add(self.keyspace_misses)
    }
}

/// Client connection counters.
///
/// Source: `INFO clients`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ClientsInfo {
    /// Source: `connected_clients` (default: 0)
    pub connected_clients: u64,

    /// Clients waiting on a blocking call.
    /// Source: `blocked_clients` (default: 0)
    pub blocked_clients: u64,

    /// Source: `maxclients` (default: [`ClientsInfo::DEFAULT_MAX_CLIENTS`])
    pub max_clients: u64,
}

impl ClientsInfo {
    /// Limit assumed when the server does not report `maxclients`.
    pub const DEFAULT_MAX_CLIENTS: u64 = 10_000;
}

impl Default for ClientsInfo {
    fn default() -> Self {
        Self {
            connected_clients: 0,
            blocked_clients: 0,
            max_clients: Self::DEFAULT_MAX_CLIENTS,
        }
    }
}

/// Replication role of the inspected server.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Master,
    Replica,
    #[default]
    Unknown,
}

impl Role {
    /// Parses the `role` field. The server reports replicas as `slave`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "master" => Role::Master,
            "slave" | "replica" => Role::Replica,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Master => "master",
            Role::Replica => "replica",
            Role::Unknown => "unknown",
        }
    }
}

/// State of a replica's link to its upstream.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    Up,
    Down,
    #[default]
    Unknown,
}

impl LinkStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "up" => LinkStatus::Up,
            "down" => LinkStatus::Down,
            _ => LinkStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Up => "up",
            LinkStatus::Down => "down",
            LinkStatus::Unknown => "unknown",
        }
    }
}

/// Replication state.
///
/// Source: `INFO replication`
///
/// Which optional fields are populated depends on the role: a master fills
/// `connected_replicas`, a replica fills `link_status` and `master_host`,
/// an unknown role fills neither.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ReplicationInfo {
    /// Source: `role` (default: unknown)
    pub role: Role,

    /// Source: `connected_slaves` (master only, default: 0)
    pub connected_replicas: Option<u64>,

    /// Source: `master_link_status` (replica only, default: unknown)
    pub link_status: Option<LinkStatus>,

    /// Source: `master_host` (replica only, default: "unknown")
    pub master_host: Option<String>,
}

/// Persistence state.
///
/// Source: `INFO persistence`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct PersistenceInfo {
    /// True when no background save is running.
    /// Source: `rdb_bgsave_in_progress == 0`
    ///
    /// This is not the configured snapshotting state; the server exposes that
    /// only through `CONFIG GET save`, which is never queried.
    pub rdb_enabled: bool,

    /// Unix time of the last successful snapshot, 0 if never.
    /// Source: `rdb_last_save_time`
    pub rdb_last_save: i64,

    /// Source: `aof_enabled == 1`
    pub aof_enabled: bool,

    /// Source: `aof_rewrite_in_progress == 1`
    pub aof_rewrite_in_progress: bool,
}

/// One entry of the server's slow log.
///
/// Source: `SLOWLOG GET <n>`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SlowEntry {
    /// Execution time in microseconds.
    pub duration_us: u64,
    /// Command arguments joined with single spaces.
    pub command: String,
}

impl SlowEntry {
    pub fn duration_ms(&self) -> f64 {
        self.duration_us as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_accepts_slave_alias() {
        assert_eq!(Role::parse("master"), Role::Master);
        assert_eq!(Role::parse("slave"), Role::Replica);
        assert_eq!(Role::parse("replica"), Role::Replica);
        assert_eq!(Role::parse("sentinel"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
    }

    #[test]
    fn test_link_status_parse() {
        assert_eq!(LinkStatus::parse("up"), LinkStatus::Up);
        assert_eq!(LinkStatus::parse("down"), LinkStatus::Down);
        assert_eq!(LinkStatus::parse("connecting"), LinkStatus::Unknown);
    }

    #[test]
    fn test_clients_default_max() {
        assert_eq!(ClientsInfo::default().max_clients, 10_000);
    }

    #[test]
    fn test_keyspace_lookups_saturates() {
        let stats = StatsInfo {
            keyspace_hits: u64::MAX,
            keyspace_misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.keyspace_lookups(), u64::MAX);
    }

    #[test]
    fn test_slow_entry_duration_ms() {
        let entry = SlowEntry {
            duration_us: 12_345,
            command: "KEYS *".to_string(),
        };
        assert!((entry.duration_ms() - 12.345).abs() < f64::EPSILON);
    }
}
