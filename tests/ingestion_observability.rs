use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use gtfs_ingest::ingestion::{
    ingest_from_path, CompositeObserver, FileObserver, IngestionContext, IngestionEngine,
    IngestionObserver, IngestionOptions, IngestionSeverity, IngestionSummary, TableStats,
    TracingObserver,
};
use gtfs_ingest::sink::Feed;
use gtfs_ingest::types::MemorySource;
use gtfs_ingest::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    tables: Mutex<Vec<TableStats>>,
    successes: Mutex<usize>,
    failures: Mutex<Vec<IngestionSeverity>>,
    alerts: Mutex<Vec<IngestionSeverity>>,
}

impl IngestionObserver for RecordingObserver {
    fn on_table_decoded(&self, _ctx: &IngestionContext, stats: &TableStats) {
        self.tables.lock().unwrap().push(stats.clone());
    }

    fn on_success(&self, _ctx: &IngestionContext, _summary: &IngestionSummary) {
        *self.successes.lock().unwrap() += 1;
    }

    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(
        &self,
        _ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(
    obs: Arc<dyn IngestionObserver>,
    alert_at_or_above: IngestionSeverity,
) -> IngestionOptions {
    IngestionOptions {
        observer: Some(obs),
        alert_at_or_above,
        ..Default::default()
    }
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    // Missing directory -> walk error wrapping io -> Critical
    let _ = ingest_from_path("tests/fixtures/does_not_exist", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![IngestionSeverity::Critical]);
}

#[test]
fn observer_receives_failure_without_alert_for_non_critical_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    // Missing mandatory table -> Error severity (not Critical) -> should not alert
    let source = MemorySource::new().with_rows("agency", &[]);
    let _ = IngestionEngine::new(opts)
        .ingest(&source, &mut Feed::new())
        .unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn observer_sees_each_table_then_success() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), IngestionSeverity::Critical);

    let feed = ingest_from_path("tests/fixtures/minimal_feed", &opts).unwrap();

    let tables = obs.tables.lock().unwrap().clone();
    let names: Vec<&str> = tables.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(names, vec!["agency", "calendar", "routes", "stops", "trips", "stop_times"]);
    assert_eq!(tables.iter().map(|t| t.records).sum::<usize>(), feed.record_count());
    assert_eq!(*obs.successes.lock().unwrap(), 1);
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn composite_observer_fans_out_and_file_observer_writes_json_lines() {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let log_path = std::env::temp_dir().join(format!("gtfs-ingest-observer-{nanos}.jsonl"));

    let recording = Arc::new(RecordingObserver::default());
    let observers: Vec<Arc<dyn IngestionObserver>> =
        vec![recording.clone(), Arc::new(FileObserver::new(&log_path))];
    let composite = CompositeObserver::new(observers);
    let opts = options_with(Arc::new(composite), IngestionSeverity::Error);

    let source = MemorySource::new().with_rows("agency", &[]);
    let _ = IngestionEngine::new(opts)
        .ingest(&source, &mut Feed::new())
        .unwrap_err();

    assert_eq!(*recording.failures.lock().unwrap(), vec![IngestionSeverity::Error]);
    assert_eq!(*recording.alerts.lock().unwrap(), vec![IngestionSeverity::Error]);

    let contents = fs::read_to_string(&log_path).unwrap();
    let events: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event"], "fail");
    assert_eq!(events[1]["event"], "alert");
    assert_eq!(events[1]["severity"], "Error");
    assert!(
        events[0]["error"]
            .as_str()
            .unwrap()
            .contains("missing required table 'stops'")
    );

    let _ = fs::remove_file(&log_path);
}

#[test]
fn tracing_observer_runs_under_a_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gtfs_ingest=debug")
        .with_test_writer()
        .try_init();

    let opts = options_with(Arc::new(TracingObserver), IngestionSeverity::Error);
    let feed = ingest_from_path("tests/fixtures/minimal_feed", &opts).unwrap();
    assert_eq!(feed.record_count(), 11);

    let source = MemorySource::new();
    let err = IngestionEngine::new(opts)
        .ingest(&source, &mut Feed::new())
        .unwrap_err();
    assert_eq!(IngestionSeverity::for_error(&err), IngestionSeverity::Error);
}
