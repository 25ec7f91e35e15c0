//! rkvhealth - health monitor for key-value servers speaking the Redis protocol.
//!
//! Connects to a server, collects its `INFO` sections and slow log, checks
//! them against fixed thresholds and prints a dashboard once or at a fixed
//! interval.

mod presenter;

use std::process;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use rkvhealth_core::collector::{Collector, RedisSource, SourceConfig, SourceError};
use rkvhealth_core::scheduler::{RunError, Scheduler, Shutdown};

use presenter::{JsonPresenter, Output, TerminalPresenter};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Health monitor for Redis-compatible key-value servers.
#[derive(Parser, Debug)]
#[command(name = "rkvhealth", about = "Key-value server health monitor", version = VERSION)]
struct Args {
    /// Server host.
    #[arg(long, default_value = "localhost", env = "RKVHEALTH_HOST")]
    host: String,

    /// Server port.
    #[arg(short, long, default_value_t = SourceConfig::DEFAULT_PORT, env = "RKVHEALTH_PORT")]
    port: u16,

    /// Run a single check and exit.
    #[arg(long)]
    once: bool,

    /// Refresh interval in seconds.
    #[arg(
        short,
        long,
        default_value = "5",
        env = "RKVHEALTH_INTERVAL",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    interval: u64,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Connection timeout in seconds.
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    connect_timeout: u64,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let shutdown = Shutdown::new();
    let handle = shutdown.clone();
    let once = args.once;
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        if interrupt(&handle, once) {
            process::exit(0);
        }
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let config = SourceConfig::new(&args.host, args.port)
        .with_connect_timeout(Duration::from_secs(args.connect_timeout));
    let source = match RedisSource::new(config) {
        Ok(source) => source,
        Err(e) => {
            error!("Invalid server address {}:{}: {}", args.host, args.port, e);
            process::exit(1);
        }
    };
    let address = source.config().address();

    let mut collector = Collector::new(source);
    if let Err(e) = collector.ping() {
        error!("Cannot connect to {}: {}", address, e);
        print_connect_hint(&address, &e);
        process::exit(1);
    }

    let interval = Duration::from_secs(args.interval);
    let refresh = (!args.once).then_some(interval);
    let output = match args.format {
        Format::Text => Output::Text(TerminalPresenter::stdout(refresh)),
        Format::Json => Output::Json(JsonPresenter::new(std::io::stdout())),
    };
    let mut scheduler = Scheduler::new(collector, output).with_interval(interval);

    if args.once {
        match scheduler.run_once() {
            Ok(snapshot) => {
                info!("{} warning(s)", snapshot.warnings.len());
            }
            Err(e) => {
                error!("Health check failed: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    match scheduler.run_continuous(&shutdown) {
        Ok(_) => info!("Monitoring stopped. Goodbye!"),
        Err(RunError::Present(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            info!("Output closed, stopping");
        }
        Err(e) => {
            error!("Monitoring aborted: {}", e);
            process::exit(1);
        }
    }
}

/// Handles Ctrl-C: stops the continuous loop at its next sleep. Returns true
/// when the process should exit right away, which is the case for a
/// single-shot run since it has no loop to stop.
fn interrupt(shutdown: &Shutdown, once: bool) -> bool {
    shutdown.trigger();
    once
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
/// Logs go to stderr so they never mix with the dashboard.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["rkvhealth", "rkvhealth_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints a colored connection error with hints.
fn print_connect_hint(address: &str, error: &SourceError) {
    // ANSI colors: red for error, yellow for hints, reset after
    const RED: &str = "\x1b[1;31m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    eprintln!("{RED}Cannot connect to {address}: {error}{RESET}");
    eprintln!();
    eprintln!("{YELLOW}  Make sure the server is running, e.g.:");
    eprintln!("    redis-server");
    eprintln!();
    eprintln!("  Or point the monitor elsewhere:");
    eprintln!("    rkvhealth --host <HOST> --port <PORT>");
    eprintln!("    export RKVHEALTH_HOST=<HOST> RKVHEALTH_PORT=<PORT>{RESET}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("rkvhealth").chain(argv.iter().copied()))
    }

    #[test]
    fn defaults() {
        let args = parse(&[]).unwrap();
        assert!(!args.once);
        assert_eq!(args.format, Format::Text);
        assert_eq!(args.connect_timeout, 5);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn explicit_flags() {
        let args = parse(&[
            "--host", "cache-1", "--port", "6380", "--once", "--interval", "2", "--format",
            "json", "-vv",
        ])
        .unwrap();
        assert_eq!(args.host, "cache-1");
        assert_eq!(args.port, 6380);
        assert!(args.once);
        assert_eq!(args.interval, 2);
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn interrupt_exits_single_shot_and_stops_loop() {
        let shutdown = Shutdown::new();
        assert!(interrupt(&shutdown, true));
        assert!(shutdown.is_triggered());

        let shutdown = Shutdown::new();
        assert!(!interrupt(&shutdown, false));
        assert!(shutdown.is_triggered());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(parse(&["--interval", "0"]).is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(parse(&["--port", "70000"]).is_err());
        assert!(parse(&["--port", "redis"]).is_err());
    }
}
