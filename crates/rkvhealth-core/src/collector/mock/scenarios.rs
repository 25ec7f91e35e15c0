//! Pre-built server scenarios for testing.
//!
//! These scenarios provide realistic `INFO` replies for a few server
//! conditions the health checks care about.

use super::source::MockSource;
use crate::collector::traits::InfoCategory;

const SERVER: &str = "\
# Server
redis_version:7.2.4
redis_mode:standalone
os:Linux 6.5.0-1022-aws x86_64
arch_bits:64
process_id:1
tcp_port:6379
uptime_in_seconds:864000
uptime_in_days:10
executable:/usr/local/bin/redis-server
";

const MEMORY_NOMINAL: &str = "\
# Memory
used_memory:52428800
used_memory_human:50.00M
used_memory_rss:57671680
used_memory_peak:62914560
maxmemory:0
maxmemory_human:0B
maxmemory_policy:noeviction
mem_fragmentation_ratio:1.10
";

const STATS_NOMINAL: &str = "\
# Stats
total_connections_received:1204
total_commands_processed:987654
instantaneous_ops_per_sec:312
rejected_connections:0
expired_keys:120
evicted_keys:0
keyspace_hits:850
keyspace_misses:150
";

const CLIENTS_NOMINAL: &str = "\
# Clients
connected_clients:50
blocked_clients:0
maxclients:10000
";

const REPLICATION_MASTER: &str = "\
# Replication
role:master
connected_slaves:1
slave0:ip=10.0.0.12,port=6379,state=online,offset=1024,lag=0
master_repl_offset:1024
";

const PERSISTENCE_NOMINAL: &str = "\
# Persistence
loading:0
rdb_changes_since_last_save:12
rdb_bgsave_in_progress:0
rdb_last_save_time:1700000000
rdb_last_bgsave_status:ok
aof_enabled:0
aof_rewrite_in_progress:0
";

#[allow(dead_code)]
impl MockSource {
    /// Healthy master: every check passes.
    ///
    /// 85% hit rate over 1000 lookups, 50 of 10000 clients, fragmentation
    /// 1.10, no evictions, two slow log entries.
    pub fn healthy_master() -> Self {
        let mut source = Self::new()
            .with_section(InfoCategory::Server, SERVER)
            .with_section(InfoCategory::Memory, MEMORY_NOMINAL)
            .with_section(InfoCategory::Stats, STATS_NOMINAL)
            .with_section(InfoCategory::Clients, CLIENTS_NOMINAL)
            .with_section(InfoCategory::Replication, REPLICATION_MASTER)
            .with_section(InfoCategory::Persistence, PERSISTENCE_NOMINAL);
        source.add_slow_entry(25_300, "KEYS user:*");
        source.add_slow_entry(11_020, "HGETALL session:9f2c");
        source
    }

    /// Replica whose link to the master is down; all other metrics nominal.
    pub fn replica_link_down() -> Self {
        Self::healthy_master().with_section(
            InfoCategory::Replication,
            "\
# Replication
role:slave
master_host:10.0.0.11
master_port:6379
master_link_status:down
master_last_io_seconds_ago:-1
master_sync_in_progress:0
",
        )
    }

    /// Replica with a healthy link.
    pub fn replica_link_up() -> Self {
        Self::healthy_master().with_section(
            InfoCategory::Replication,
            "\
# Replication
role:slave
master_host:10.0.0.11
master_port:6379
master_link_status:up
",
        )
    }

    /// Memory-constrained server: fragmented and evicting keys.
    pub fn memory_pressure() -> Self {
        Self::healthy_master()
            .with_section(
                InfoCategory::Memory,
                "\
# Memory
used_memory:1073741824
used_memory_human:1.00G
maxmemory:1073741824
maxmemory_human:1.00G
maxmemory_policy:allkeys-lru
mem_fragmentation_ratio:1.87
",
            )
            .with_section(
                InfoCategory::Stats,
                STATS_NOMINAL.replace("evicted_keys:0", "evicted_keys:4821"),
            )
    }

    /// 9000 of 10000 client slots in use.
    pub fn saturated_clients() -> Self {
        Self::healthy_master().with_section(
            InfoCategory::Clients,
            "\
# Clients
connected_clients:9000
blocked_clients:12
maxclients:10000
",
        )
    }

    /// Busy server missing most lookups: 40% hit rate over 5000 lookups.
    pub fn cold_cache() -> Self {
        Self::healthy_master().with_section(
            InfoCategory::Stats,
            STATS_NOMINAL
                .replace("keyspace_hits:850", "keyspace_hits:2000")
                .replace("keyspace_misses:150", "keyspace_misses:3000"),
        )
    }

    /// Every rule triggers at once.
    pub fn everything_wrong() -> Self {
        let mut source = Self::memory_pressure();
        let replica = Self::replica_link_down();
        let clients = Self::saturated_clients();
        source.set_section(
            InfoCategory::Replication,
            replica.section(InfoCategory::Replication),
        );
        source.set_section(InfoCategory::Clients, clients.section(InfoCategory::Clients));
        source.set_section(
            InfoCategory::Stats,
            STATS_NOMINAL
                .replace("evicted_keys:0", "evicted_keys:4821")
                .replace("keyspace_hits:850", "keyspace_hits:2000")
                .replace("keyspace_misses:150", "keyspace_misses:3000"),
        );
        source
    }

    /// Server that answers but reports nothing.
    pub fn empty_server() -> Self {
        Self::new()
    }
}
