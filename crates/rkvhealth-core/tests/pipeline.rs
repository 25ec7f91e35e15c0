//! End-to-end checks of collect → analyze → present over the mock source.

use std::io;
use std::time::Duration;

use rkvhealth_core::analysis::{Severity, Warning, analyze};
use rkvhealth_core::collector::{CollectError, Collector, InfoCategory, MockSource};
use rkvhealth_core::model::{HealthSnapshot, LinkStatus, Role};
use rkvhealth_core::scheduler::{Presenter, Scheduler, Shutdown};

#[derive(Default)]
struct Capture {
    reports: Vec<HealthSnapshot>,
    outages: usize,
}

impl Presenter for Capture {
    fn present(&mut self, snapshot: &HealthSnapshot, _warnings: &[Warning]) -> io::Result<()> {
        self.reports.push(snapshot.clone());
        Ok(())
    }

    fn unavailable(&mut self, _timestamp: i64, _error: &CollectError) -> io::Result<()> {
        self.outages += 1;
        Ok(())
    }
}

fn collect(source: MockSource) -> HealthSnapshot {
    Collector::new(source).collect().unwrap()
}

#[test]
fn used_memory_is_reported_in_megabytes() {
    let source = MockSource::new().with_section(InfoCategory::Memory, "used_memory:52428800\n");
    assert_eq!(collect(source).memory.used_memory_mb, 50.0);
}

#[test]
fn zero_max_memory_is_unbounded() {
    let source = MockSource::new().with_section(InfoCategory::Memory, "maxmemory:0\n");
    assert_eq!(collect(source).memory.max_memory_mb, None);
}

#[test]
fn nominal_master_is_all_clear() {
    let source = MockSource::new()
        .with_section(
            InfoCategory::Memory,
            "mem_fragmentation_ratio:1.1\nevicted_keys:0\n",
        )
        .with_section(InfoCategory::Stats, "keyspace_hits:850\nkeyspace_misses:150\n")
        .with_section(
            InfoCategory::Clients,
            "connected_clients:50\nmaxclients:10000\n",
        )
        .with_section(InfoCategory::Replication, "role:master\n");

    let snapshot = collect(source);
    assert_eq!(snapshot.replication.role, Role::Master);
    assert!(analyze(&snapshot).is_empty());
}

#[test]
fn replica_with_link_down_yields_one_critical_warning() {
    let snapshot = collect(MockSource::replica_link_down());
    assert_eq!(snapshot.replication.link_status, Some(LinkStatus::Down));

    let warnings = analyze(&snapshot);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].severity, Severity::Critical);
}

#[test]
fn every_rule_fires_in_fixed_order() {
    let warnings = analyze(&collect(MockSource::everything_wrong()));
    let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "High memory fragmentation: 1.87",
            "Keys being evicted: 4821",
            "High client usage: 90.0%",
            "Low cache hit rate: 40.0%",
            "Replication link DOWN!",
        ]
    );
}

#[test]
fn single_scenarios_trigger_single_rules() {
    let cases = [
        (MockSource::saturated_clients(), "client_saturation"),
        (MockSource::cold_cache(), "hit_rate_low"),
    ];
    for (source, rule) in cases {
        let warnings = analyze(&collect(source));
        assert_eq!(warnings.len(), 1, "{rule}");
        assert_eq!(warnings[0].rule_id, rule);
    }

    let memory: Vec<&str> = analyze(&collect(MockSource::memory_pressure()))
        .iter()
        .map(|w| w.rule_id)
        .collect();
    assert_eq!(memory, vec!["memory_fragmentation", "keys_evicted"]);
}

#[test]
fn replica_link_up_is_all_clear() {
    assert!(analyze(&collect(MockSource::replica_link_up())).is_empty());
}

#[test]
fn continuous_mode_reports_outage_and_recovers() {
    let shutdown = Shutdown::new();
    let mut source = MockSource::memory_pressure();
    source.fail_next(1);

    let mut scheduler = Scheduler::new(Collector::new(source), Capture::default())
        .with_interval(Duration::from_millis(5));

    let handle = shutdown.clone();
    let stopper = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        handle.trigger();
    });
    let summary = scheduler.run_continuous(&shutdown).unwrap();
    stopper.join().unwrap();

    let capture = scheduler.presenter();
    assert_eq!(capture.outages, 1);
    assert_eq!(summary.failed_cycles, 1);
    assert!(!capture.reports.is_empty());
    for report in &capture.reports {
        assert_eq!(report.warnings.len(), 2);
    }
}
