//! Metrics source backed by a live server connection.
//!
//! Connects over the Redis protocol using the standard `redis` client.
//! The connection is opened lazily and dropped on any connectivity error so
//! the next call reconnects.

use std::time::Duration;

use redis::{Client, Cmd, ConnectionAddr, ConnectionInfo, FromRedisValue, RedisConnectionInfo, Value};
use tracing::{debug, info};

use super::info::parse_info;
use super::traits::{InfoCategory, MetricsSource, RawFields, SourceError};
use crate::model::SlowEntry;

/// Connection settings for [`RedisSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    pub host: String,
    pub port: u16,
    /// Time allowed to establish the TCP connection.
    pub connect_timeout: Duration,
    /// Read/write timeout applied to every query.
    pub io_timeout: Duration,
}

impl SourceConfig {
    pub const DEFAULT_PORT: u16 = 6379;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Self::DEFAULT_TIMEOUT,
            io_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// `host:port` for display.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new("localhost", Self::DEFAULT_PORT)
    }
}

impl From<redis::RedisError> for SourceError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
        {
            SourceError::Unreachable(err.to_string())
        } else if err.kind() == redis::ErrorKind::TypeError {
            SourceError::Protocol(err.to_string())
        } else {
            SourceError::Command(err.to_string())
        }
    }
}

/// [`MetricsSource`] talking to a real server.
pub struct RedisSource {
    config: SourceConfig,
    client: Client,
    conn: Option<redis::Connection>,
}

impl RedisSource {
    /// Creates a source without connecting. The first query connects.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = Client::open(config.connection_info())?;
        Ok(Self {
            config,
            client,
            conn: None,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn connection(&mut self) -> Result<&mut redis::Connection, SourceError> {
        if self.conn.is_none() {
            debug!("connecting to {}", self.config.address());
            let conn = self
                .client
                .get_connection_with_timeout(self.config.connect_timeout)?;
            conn.set_read_timeout(Some(self.config.io_timeout))?;
            conn.set_write_timeout(Some(self.config.io_timeout))?;
            info!("connected to {}", self.config.address());
            self.conn = Some(conn);
        }
        self.conn
            .as_mut()
            .ok_or_else(|| SourceError::Unreachable("connection not established".to_string()))
    }

    fn query<T: FromRedisValue>(&mut self, cmd: &Cmd) -> Result<T, SourceError> {
        let conn = self.connection()?;
        match cmd.query::<T>(conn) {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = SourceError::from(e);
                if err.is_connectivity() {
                    self.conn = None;
                }
                Err(err)
            }
        }
    }
}

impl MetricsSource for RedisSource {
    fn ping(&mut self) -> Result<(), SourceError> {
        let reply: String = self.query(&redis::cmd("PING"))?;
        if reply.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(SourceError::Protocol(format!("PING returned {reply:?}")))
        }
    }

    fn category(&mut self, category: InfoCategory) -> Result<RawFields, SourceError> {
        let mut cmd = redis::cmd("INFO");
        cmd.arg(category.section());
        let body: String = self.query(&cmd)?;
        Ok(parse_info(&body))
    }

    fn slow_entries(&mut self, count: usize) -> Result<Vec<SlowEntry>, SourceError> {
        let mut cmd = redis::cmd("SLOWLOG");
        cmd.arg("GET").arg(count);
        let reply: Value = self.query(&cmd)?;
        parse_slowlog(reply)
    }
}

/// Parses a `SLOWLOG GET` reply.
///
/// Each entry is `[id, timestamp, duration_us, [arg, ...], client_addr, client_name]`;
/// the last two elements are missing on old servers.
pub(crate) fn parse_slowlog(reply: Value) -> Result<Vec<SlowEntry>, SourceError> {
    match reply {
        Value::Array(items) => items.into_iter().map(parse_slow_entry).collect(),
        Value::Nil => Ok(Vec::new()),
        other => Err(SourceError::Protocol(format!(
            "SLOWLOG GET: expected array, got {other:?}"
        ))),
    }
}

fn parse_slow_entry(item: Value) -> Result<SlowEntry, SourceError> {
    let Value::Array(fields) = item else {
        return Err(SourceError::Protocol("slow log entry is not an array".into()));
    };

    let duration_us = match fields.get(2) {
        Some(Value::Int(us)) if *us >= 0 => *us as u64,
        other => {
            return Err(SourceError::Protocol(format!(
                "slow log entry duration: {other:?}"
            )));
        }
    };

    let command = match fields.get(3) {
        Some(Value::Array(args)) => args
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(" "),
        other => {
            return Err(SourceError::Protocol(format!(
                "slow log entry arguments: {other:?}"
            )));
        }
    };

    Ok(SlowEntry {
        duration_us,
        command,
    })
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::BulkString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Value::SimpleString(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Okay => "OK".to_string(),
        _ => String::new(),
    }
}
