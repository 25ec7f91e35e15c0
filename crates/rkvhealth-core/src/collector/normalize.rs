//! Conversion of raw `INFO` fields into the typed metric structures.
//!
//! Every builder accepts a possibly empty field map and never fails.

use super::info::{field_f64, field_flag, field_i64, field_str, field_u64};
use super::traits::RawFields;
use crate::model::{
    ClientsInfo, LinkStatus, MemoryInfo, PersistenceInfo, ReplicationInfo, Role, ServerInfo,
    StatsInfo,
};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Rounds to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts bytes to MiB rounded to 2 decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

pub fn server_info(fields: &RawFields) -> ServerInfo {
    ServerInfo {
        version: field_str(fields, "redis_version", "Unknown"),
        os: field_str(fields, "os", "Unknown"),
        uptime_days: field_u64(fields, "uptime_in_days", 0),
        uptime_seconds: field_u64(fields, "uptime_in_seconds", 0),
    }
}

/// Builds memory metrics. `evicted_keys` is looked up in the memory section
/// first and then in `stats`, where servers actually report it.
pub fn memory_info(fields: &RawFields, stats: &RawFields) -> MemoryInfo {
    let max_memory = field_u64(fields, "maxmemory", 0);
    let evicted_keys = match fields.get("evicted_keys") {
        Some(_) => field_u64(fields, "evicted_keys", 0),
        None => field_u64(stats, "evicted_keys", 0),
    };

    MemoryInfo {
        used_memory_mb: bytes_to_mb(field_u64(fields, "used_memory", 0)),
        used_memory_human: field_str(fields, "used_memory_human", "N/A"),
        max_memory_mb: (max_memory > 0).then(|| bytes_to_mb(max_memory)),
        fragmentation_ratio: round2(field_f64(fields, "mem_fragmentation_ratio", 0.0)),
        evicted_keys,
    }
}

pub fn stats_info(fields: &RawFields) -> StatsInfo {
    StatsInfo {
        total_connections: field_u64(fields, "total_connections_received", 0),
        total_commands: field_u64(fields, "total_commands_processed", 0),
        ops_per_sec: field_f64(fields, "instantaneous_ops_per_sec", 0.0),
        rejected_connections: field_u64(fields, "rejected_connections", 0),
        keyspace_hits: field_u64(fields, "keyspace_hits", 0),
        keyspace_misses: field_u64(fields, "keyspace_misses", 0),
    }
}

pub fn clients_info(fields: &RawFields) -> ClientsInfo {
    ClientsInfo {
        connected_clients: field_u64(fields, "connected_clients", 0),
        blocked_clients: field_u64(fields, "blocked_clients", 0),
        max_clients: field_u64(fields, "maxclients", ClientsInfo::DEFAULT_MAX_CLIENTS),
    }
}

/// Builds replication state; the role decides which optional fields exist.
pub fn replication_info(fields: &RawFields) -> ReplicationInfo {
    let role = Role::parse(&field_str(fields, "role", "unknown"));
    match role {
        Role::Master => ReplicationInfo {
            role,
            connected_replicas: Some(field_u64(fields, "connected_slaves", 0)),
            ..Default::default()
        },
        Role::Replica => ReplicationInfo {
            role,
            link_status: Some(LinkStatus::parse(&field_str(
                fields,
                "master_link_status",
                "unknown",
            ))),
            master_host: Some(field_str(fields, "master_host", "unknown")),
            ..Default::default()
        },
        Role::Unknown => ReplicationInfo::default(),
    }
}

pub fn persistence_info(fields: &RawFields) -> PersistenceInfo {
    PersistenceInfo {
        rdb_enabled: field_flag(fields, "rdb_bgsave_in_progress", 0, 0),
        rdb_last_save: field_i64(fields, "rdb_last_save_time", 0),
        aof_enabled: field_flag(fields, "aof_enabled", 1, 0),
        aof_rewrite_in_progress: field_flag(fields, "aof_rewrite_in_progress", 1, 0),
    }
}
