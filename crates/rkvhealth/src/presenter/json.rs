//! One JSON document per cycle, newline-delimited.

use std::io::{self, Write};

use serde::Serialize;

use rkvhealth_core::analysis::{Warning, client_saturation, hit_rate};
use rkvhealth_core::collector::CollectError;
use rkvhealth_core::model::{
    ClientsInfo, HealthSnapshot, MemoryInfo, PersistenceInfo, ReplicationInfo, ServerInfo,
    SlowEntry, StatsInfo,
};
use rkvhealth_core::scheduler::Presenter;

/// Snapshot metrics plus the warnings handed to the presenter.
#[derive(Serialize)]
struct Report<'a> {
    timestamp: i64,
    server: &'a ServerInfo,
    memory: &'a MemoryInfo,
    stats: &'a StatsInfo,
    clients: &'a ClientsInfo,
    replication: &'a ReplicationInfo,
    persistence: &'a PersistenceInfo,
    slow_log: &'a [SlowEntry],
    hit_rate: f64,
    client_saturation: f64,
    warnings: &'a [Warning],
}

impl<'a> Report<'a> {
    fn new(snapshot: &'a HealthSnapshot, warnings: &'a [Warning]) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            server: &snapshot.server,
            memory: &snapshot.memory,
            stats: &snapshot.stats,
            clients: &snapshot.clients,
            replication: &snapshot.replication,
            persistence: &snapshot.persistence,
            slow_log: &snapshot.slow_log,
            hit_rate: hit_rate(&snapshot.stats),
            client_saturation: client_saturation(&snapshot.clients),
            warnings,
        }
    }
}

#[derive(Serialize)]
struct Unavailable<'a> {
    timestamp: i64,
    error: String,
    category: &'a str,
}

pub struct JsonPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Presenter for JsonPresenter<W> {
    fn present(&mut self, snapshot: &HealthSnapshot, warnings: &[Warning]) -> io::Result<()> {
        self.emit(&Report::new(snapshot, warnings))
    }

    fn unavailable(&mut self, timestamp: i64, error: &CollectError) -> io::Result<()> {
        let CollectError::Connectivity { category, .. } = error;
        self.emit(&Unavailable {
            timestamp,
            error: error.to_string(),
            category: category.section(),
        })
    }
}
