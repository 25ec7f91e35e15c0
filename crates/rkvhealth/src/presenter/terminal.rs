//! Human-readable dashboard on stdout.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};

use rkvhealth_core::analysis::{Severity, Warning, hit_rate};
use rkvhealth_core::collector::CollectError;
use rkvhealth_core::fmt::{
    format_decimal, format_duration, format_max_memory, format_ms, format_thousands,
    format_timestamp, truncate,
};
use rkvhealth_core::model::{HealthSnapshot, Role};
use rkvhealth_core::scheduler::Presenter;

const RULE_WIDTH: usize = 70;
/// Slow-log commands longer than this are cut.
const COMMAND_MAX_CHARS: usize = 60;

pub struct TerminalPresenter<W: Write> {
    out: W,
    /// Clear the screen before each frame (continuous mode on a tty).
    clear: bool,
    color: bool,
    /// Shown in the footer; `None` in single-shot mode.
    refresh: Option<Duration>,
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout(refresh: Option<Duration>) -> Self {
        use std::io::IsTerminal;
        let tty = io::stdout().is_terminal();
        Self::new(io::stdout(), refresh)
            .with_clear(tty && refresh.is_some())
            .with_color(tty)
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, refresh: Option<Duration>) -> Self {
        Self {
            out,
            clear: false,
            color: false,
            refresh,
        }
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn begin_frame(&mut self) -> io::Result<()> {
        if self.clear {
            execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "{:^width$}", "KEY-VALUE HEALTH MONITOR", width = RULE_WIDTH)?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    fn end_frame(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        match self.refresh {
            Some(interval) => writeln!(
                self.out,
                "Press Ctrl+C to exit | Refreshes every {}",
                format_duration(interval.as_secs())
            )?,
            None => writeln!(self.out, "Single check complete")?,
        }
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        self.out.flush()
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}", title.bold())
        } else {
            writeln!(self.out, "{title}")
        }
    }

    fn warning_line(&mut self, warning: &Warning) -> io::Result<()> {
        let label = format!("{:<8}", warning.severity.as_str().to_ascii_uppercase());
        if !self.color {
            return writeln!(self.out, "   [{label}] {}", warning.message);
        }
        match warning.severity {
            Severity::Caution => writeln!(self.out, "   [{}] {}", label.yellow(), warning.message),
            Severity::Critical => writeln!(
                self.out,
                "   [{}] {}",
                label.red().bold(),
                warning.message.as_str().red()
            ),
        }
    }

    fn render(&mut self, snapshot: &HealthSnapshot, warnings: &[Warning]) -> io::Result<()> {
        self.begin_frame()?;
        writeln!(
            self.out,
            "Timestamp: {}\n",
            format_timestamp(snapshot.timestamp)
        )?;

        let server = &snapshot.server;
        self.heading("SERVER INFORMATION")?;
        writeln!(self.out, "   Version: {}", server.version)?;
        writeln!(self.out, "   OS: {}", server.os)?;
        writeln!(
            self.out,
            "   Uptime: {} days ({} seconds)\n",
            server.uptime_days, server.uptime_seconds
        )?;

        let memory = &snapshot.memory;
        self.heading("MEMORY USAGE")?;
        writeln!(
            self.out,
            "   Used Memory: {} ({} MB)",
            memory.used_memory_human,
            format_decimal(memory.used_memory_mb)
        )?;
        writeln!(
            self.out,
            "   Max Memory: {}",
            format_max_memory(memory.max_memory_mb)
        )?;
        writeln!(
            self.out,
            "   Fragmentation Ratio: {}",
            format_decimal(memory.fragmentation_ratio)
        )?;
        writeln!(
            self.out,
            "   Evicted Keys: {}\n",
            format_thousands(memory.evicted_keys)
        )?;

        let stats = &snapshot.stats;
        self.heading("PERFORMANCE STATS")?;
        writeln!(self.out, "   Operations/sec: {}", stats.ops_per_sec)?;
        writeln!(
            self.out,
            "   Total Commands: {}",
            format_thousands(stats.total_commands)
        )?;
        writeln!(
            self.out,
            "   Total Connections: {}",
            format_thousands(stats.total_connections)
        )?;
        writeln!(
            self.out,
            "   Cache Hit Rate: {}%",
            format_decimal(hit_rate(stats))
        )?;
        writeln!(
            self.out,
            "   Rejected Connections: {}\n",
            stats.rejected_connections
        )?;

        let clients = &snapshot.clients;
        self.heading("CONNECTED CLIENTS")?;
        writeln!(self.out, "   Connected: {}", clients.connected_clients)?;
        writeln!(self.out, "   Blocked: {}", clients.blocked_clients)?;
        writeln!(self.out, "   Max Clients: {}\n", clients.max_clients)?;

        let repl = &snapshot.replication;
        self.heading("REPLICATION")?;
        writeln!(
            self.out,
            "   Role: {}",
            repl.role.as_str().to_ascii_uppercase()
        )?;
        match repl.role {
            Role::Master => writeln!(
                self.out,
                "   Connected Replicas: {}",
                repl.connected_replicas.unwrap_or(0)
            )?,
            Role::Replica => {
                writeln!(
                    self.out,
                    "   Master: {}",
                    repl.master_host.as_deref().unwrap_or("N/A")
                )?;
                writeln!(
                    self.out,
                    "   Link Status: {}",
                    repl.link_status.map_or("N/A", |s| s.as_str())
                )?;
            }
            Role::Unknown => {}
        }
        writeln!(self.out)?;

        let persist = &snapshot.persistence;
        self.heading("PERSISTENCE")?;
        writeln!(self.out, "   RDB Enabled: {}", yes_no(persist.rdb_enabled))?;
        if persist.rdb_last_save > 0 {
            writeln!(
                self.out,
                "   Last RDB Save: {}",
                format_timestamp(persist.rdb_last_save)
            )?;
        }
        writeln!(self.out, "   AOF Enabled: {}", yes_no(persist.aof_enabled))?;
        if persist.aof_rewrite_in_progress {
            writeln!(self.out, "   AOF Rewrite: in progress")?;
        }
        writeln!(self.out)?;

        if !snapshot.slow_log.is_empty() {
            self.heading("RECENT SLOW QUERIES")?;
            for (i, entry) in snapshot.slow_log.iter().enumerate() {
                writeln!(
                    self.out,
                    "   {}. {} - {}",
                    i + 1,
                    format_ms(entry.duration_ms()),
                    truncate(&entry.command, COMMAND_MAX_CHARS)
                )?;
            }
            writeln!(self.out)?;
        }

        if warnings.is_empty() {
            if self.color {
                writeln!(self.out, "{}\n", "ALL HEALTH CHECKS PASSED".green().bold())?;
            } else {
                writeln!(self.out, "ALL HEALTH CHECKS PASSED\n")?;
            }
        } else {
            self.heading("HEALTH WARNINGS")?;
            for warning in warnings {
                self.warning_line(warning)?;
            }
            writeln!(self.out)?;
        }

        self.end_frame()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, snapshot: &HealthSnapshot, warnings: &[Warning]) -> io::Result<()> {
        self.render(snapshot, warnings)
    }

    fn unavailable(&mut self, timestamp: i64, error: &CollectError) -> io::Result<()> {
        self.begin_frame()?;
        writeln!(self.out, "Timestamp: {}\n", format_timestamp(timestamp))?;
        if self.color {
            writeln!(self.out, "{}", "DATA UNAVAILABLE".red().bold())?;
        } else {
            writeln!(self.out, "DATA UNAVAILABLE")?;
        }
        writeln!(self.out, "   {error}")?;
        writeln!(self.out, "   Retrying on the next refresh.\n")?;
        self.end_frame()
    }
}
