//! Ingestion engine: mandatory-table check, scheduling, and per-table decoding.
//!
//! Most callers should use [`ingest_from_path`] for a feed directory, or [`IngestionEngine`] when
//! they bring their own [`TableSource`] or [`FeedSink`].
//!
//! - The mandatory tables are checked before anything is decoded.
//! - Tables are decoded one at a time, in [`DependencyScheduler`] order.
//! - Tables without a registered decoder are skipped.
//! - The first error aborts the run. Records of tables decoded before the failure have already
//!   reached the sink; nothing is rolled back.
//! - If an [`IngestionObserver`] is configured, per-table progress and the final outcome are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, info_span};

use crate::decode::DecoderRegistry;
use crate::error::{IngestionError, IngestionResult};
use crate::schedule::{DependencyGraph, DependencyScheduler};
use crate::sink::{Feed, FeedSink};
use crate::types::{Table, TableSource};

use super::csv::CsvDirectorySource;
use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionSummary, TableStats,
};

/// Tables every feed must contain.
pub const MANDATORY_TABLES: [&str; 6] =
    ["agency", "stops", "routes", "trips", "stop_times", "calendar"];

/// Options controlling ingestion behavior.
///
/// Use [`Default`] for standard feeds.
#[derive(Clone)]
pub struct IngestionOptions {
    /// Tables that must be present (case-insensitive) before anything is decoded.
    pub mandatory_tables: Vec<String>,
    /// Decode-order constraints between tables.
    pub dependency_graph: DependencyGraph,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("mandatory_tables", &self.mandatory_tables)
            .field("dependency_graph", &self.dependency_graph)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            mandatory_tables: MANDATORY_TABLES.iter().map(|t| t.to_string()).collect(),
            dependency_graph: DependencyGraph::gtfs(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Drives decoders over a source in dependency order.
///
/// The engine holds no per-run state, so one engine can serve concurrent runs over distinct
/// sources and sinks.
pub struct IngestionEngine {
    registry: DecoderRegistry,
    options: IngestionOptions,
}

impl fmt::Debug for IngestionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionEngine")
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for IngestionEngine {
    fn default() -> Self {
        Self::new(IngestionOptions::default())
    }
}

impl IngestionEngine {
    /// Engine with decoders for the standard feed tables.
    pub fn new(options: IngestionOptions) -> Self {
        Self::with_registry(DecoderRegistry::gtfs(), options)
    }

    pub fn with_registry(registry: DecoderRegistry, options: IngestionOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn options(&self) -> &IngestionOptions {
        &self.options
    }

    /// Ingest every table of `source` into `sink`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gtfs_ingest::ingestion::{IngestionEngine, IngestionOptions};
    /// use gtfs_ingest::sink::Feed;
    /// use gtfs_ingest::types::MemorySource;
    ///
    /// # fn main() -> Result<(), gtfs_ingest::IngestionError> {
    /// let source = MemorySource::new()
    ///     .with_rows("agency", &[&["agency_name", "agency_url", "agency_timezone"]])
    ///     .with_rows("stops", &[&["stop_id", "stop_name", "stop_lat", "stop_lon"]])
    ///     .with_rows("routes", &[])
    ///     .with_rows("trips", &[])
    ///     .with_rows("stop_times", &[])
    ///     .with_rows("calendar", &[]);
    ///
    /// let engine = IngestionEngine::new(IngestionOptions::default());
    /// let mut feed = Feed::new();
    /// let summary = engine.ingest(&source, &mut feed)?;
    ///
    /// assert_eq!(summary.tables.len(), 6);
    /// assert_eq!(summary.record_count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn ingest(
        &self,
        source: &dyn TableSource,
        sink: &mut dyn FeedSink,
    ) -> IngestionResult<IngestionSummary> {
        let ctx = IngestionContext {
            source: source.describe(),
        };
        let span = info_span!("ingest", source = %ctx.source);
        let _enter = span.enter();

        let result = self.run(&ctx, source, sink);
        report_outcome(&self.options, &ctx, result.as_ref());
        result
    }

    fn run(
        &self,
        ctx: &IngestionContext,
        source: &dyn TableSource,
        sink: &mut dyn FeedSink,
    ) -> IngestionResult<IngestionSummary> {
        let present = source.table_names();
        check_mandatory(&self.options.mandatory_tables, &present)?;

        let mut scheduler = DependencyScheduler::new(&self.options.dependency_graph, present);
        let mut summary = IngestionSummary::default();

        while let Some(table) = scheduler.next_table()? {
            let Some(decoder) = self.registry.get(&table) else {
                debug!(table = %table, "no decoder registered, skipping table");
                continue;
            };

            let span = info_span!("table", table = %table);
            let _enter = span.enter();

            let rows = source.open(&table)?;
            let records = decoder.decode(Table::new(&table, rows), sink)?;
            info!(records, "decoded table");

            let stats = TableStats { table, records };
            if let Some(obs) = self.options.observer.as_ref() {
                obs.on_table_decoded(ctx, &stats);
            }
            summary.tables.push(stats);
        }

        Ok(summary)
    }
}

/// Fail with [`IngestionError::MissingRequiredTable`] on the first mandatory table not present.
pub fn check_mandatory(mandatory: &[String], present: &[String]) -> IngestionResult<()> {
    for required in mandatory {
        if !present.iter().any(|p| p.eq_ignore_ascii_case(required)) {
            return Err(IngestionError::MissingRequiredTable {
                table: required.clone(),
            });
        }
    }
    Ok(())
}

fn report_outcome(
    options: &IngestionOptions,
    ctx: &IngestionContext,
    outcome: Result<&IngestionSummary, &IngestionError>,
) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    match outcome {
        Ok(summary) => obs.on_success(ctx, summary),
        Err(e) => {
            let sev = IngestionSeverity::for_error(e);
            obs.on_failure(ctx, sev, e);
            if sev >= options.alert_at_or_above {
                obs.on_alert(ctx, sev, e);
            }
        }
    }
}

/// Ingest `source` into a fresh in-memory [`Feed`] with default options.
pub fn ingest_feed(source: &dyn TableSource) -> IngestionResult<Feed> {
    let mut feed = Feed::new();
    IngestionEngine::default().ingest(source, &mut feed)?;
    Ok(feed)
}

/// Ingest the feed directory at `dir` (one `<table>.txt` per table) into a [`Feed`].
///
/// Failures to enumerate the directory are reported to the configured observer like any other
/// failure.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use gtfs_ingest::ingestion::{ingest_from_path, IngestionOptions, TracingObserver};
///
/// # fn main() -> Result<(), gtfs_ingest::IngestionError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(TracingObserver)),
///     ..Default::default()
/// };
/// let feed = ingest_from_path("feeds/metro", &opts)?;
/// println!("stops={}", feed.stops.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(
    dir: impl AsRef<Path>,
    options: &IngestionOptions,
) -> IngestionResult<Feed> {
    let dir = dir.as_ref();
    let source = match CsvDirectorySource::open(dir) {
        Ok(source) => source,
        Err(e) => {
            let ctx = IngestionContext {
                source: dir.display().to_string(),
            };
            report_outcome(options, &ctx, Err(&e));
            return Err(e);
        }
    };

    let mut feed = Feed::new();
    IngestionEngine::new(options.clone()).ingest(&source, &mut feed)?;
    Ok(feed)
}
