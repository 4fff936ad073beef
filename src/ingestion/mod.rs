//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`engine`]) which:
//!
//! - reads a feed directory through [`CsvDirectorySource`]
//! - checks the mandatory tables, then decodes tables in dependency order into a [`crate::sink::Feed`]
//! - optionally reports progress and success/failure/alerts to an [`IngestionObserver`]
//!
//! [`IngestionEngine`] is the lower-level entry point for custom sources and sinks.

pub mod csv;
pub mod engine;
pub mod observability;

pub use csv::CsvDirectorySource;
pub use engine::{
    check_mandatory, ingest_feed, ingest_from_path, IngestionEngine, IngestionOptions,
    MANDATORY_TABLES,
};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionSummary, TableStats, TracingObserver,
};
