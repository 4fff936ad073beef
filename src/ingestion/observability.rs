use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::error::IngestionError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (the run failed on malformed input).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

impl IngestionSeverity {
    /// Classify a failed run.
    pub fn for_error(e: &IngestionError) -> Self {
        match e {
            IngestionError::Io(_) => Self::Critical,
            IngestionError::Walk(err) if err.io_error().is_some() => Self::Critical,
            IngestionError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            IngestionError::Walk(_)
            | IngestionError::MissingRequiredTable { .. }
            | IngestionError::DuplicateTable { .. }
            | IngestionError::SchedulingDeadlock { .. }
            | IngestionError::MissingRequiredField { .. }
            | IngestionError::FieldParse { .. } => Self::Error,
        }
    }
}

/// Context about an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// Description of the source being ingested (a directory path, "memory", ...).
    pub source: String,
}

/// Outcome of decoding one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Table name as reported by the source.
    pub table: String,
    /// Number of records pushed to the sink.
    pub records: usize,
}

/// Per-table stats of a successful run, in decode order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub tables: Vec<TableStats>,
}

impl IngestionSummary {
    /// Total records pushed across all tables.
    pub fn record_count(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }

    /// Decoded table names in decode order.
    pub fn table_order(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table.as_str()).collect()
    }
}

/// Observer interface for ingestion outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Callbacks run on the ingesting
/// thread between tables.
pub trait IngestionObserver: Send + Sync {
    /// Called after each table has been decoded in full.
    fn on_table_decoded(&self, _ctx: &IngestionContext, _stats: &TableStats) {}

    /// Called when the whole run succeeds.
    fn on_success(&self, _ctx: &IngestionContext, _summary: &IngestionSummary) {}

    /// Called when the run fails.
    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &IngestionError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_table_decoded(&self, ctx: &IngestionContext, stats: &TableStats) {
        for o in &self.observers {
            o.on_table_decoded(ctx, stats);
        }
    }

    fn on_success(&self, ctx: &IngestionContext, summary: &IngestionSummary) {
        for o in &self.observers {
            o.on_success(ctx, summary);
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards ingestion events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_table_decoded(&self, ctx: &IngestionContext, stats: &TableStats) {
        tracing::debug!(
            source = %ctx.source,
            table = %stats.table,
            records = stats.records,
            "table ingested"
        );
    }

    fn on_success(&self, ctx: &IngestionContext, summary: &IngestionSummary) {
        tracing::info!(
            source = %ctx.source,
            tables = summary.tables.len(),
            records = summary.record_count(),
            "feed ingested"
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::warn!(source = %ctx.source, ?severity, %error, "feed ingestion failed");
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        tracing::error!(source = %ctx.source, ?severity, %error, "feed ingestion alert");
    }
}

/// Appends ingestion events to a local log file, one JSON object per line.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: serde_json::Value) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{event}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_table_decoded(&self, ctx: &IngestionContext, stats: &TableStats) {
        self.append(serde_json::json!({
            "ts": unix_ts(),
            "event": "table",
            "source": ctx.source,
            "table": stats.table,
            "records": stats.records,
        }));
    }

    fn on_success(&self, ctx: &IngestionContext, summary: &IngestionSummary) {
        self.append(serde_json::json!({
            "ts": unix_ts(),
            "event": "ok",
            "source": ctx.source,
            "summary": summary,
        }));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(serde_json::json!({
            "ts": unix_ts(),
            "event": "fail",
            "severity": severity,
            "source": ctx.source,
            "error": error.to_string(),
        }));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &IngestionError) {
        self.append(serde_json::json!({
            "ts": unix_ts(),
            "event": "alert",
            "severity": severity,
            "source": ctx.source,
            "error": error.to_string(),
        }));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
