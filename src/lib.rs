//! `gtfs-ingest` decodes a multi-table transit schedule feed (GTFS-style `agency`, `stops`,
//! `routes`, `trips`, `stop_times`, ...) into typed, in-memory records.
//!
//! The primary entrypoint is [`ingestion::ingest_from_path`], which reads a feed directory with one
//! `<table>.txt` file per table and returns a [`sink::Feed`].
//!
//! ## How a feed is decoded
//!
//! 1. The mandatory tables (`agency`, `stops`, `routes`, `trips`, `stop_times`, `calendar`) must
//!    all be present, otherwise [`IngestionError::MissingRequiredTable`].
//! 2. A [`schedule::DependencyScheduler`] picks tables one at a time so that, for example,
//!    `agency` is fully decoded before `routes`, and `routes` before `trips`.
//! 3. Each table is decoded by the [`decode::TableDecoder`] registered for its name
//!    (case-insensitive). Unknown tables are skipped; unknown columns are ignored.
//! 4. Rows are decoded by column name, each field passing through a [`coercion`] function.
//!    Records are pushed to a [`sink::FeedSink`] in row order.
//!
//! Any failure aborts the whole run: a missing required column
//! ([`IngestionError::MissingRequiredField`]), a malformed value
//! ([`IngestionError::FieldParse`]), or an unsatisfiable table order
//! ([`IngestionError::SchedulingDeadlock`]).
//!
//! ## Quick example
//!
//! ```rust
//! use gtfs_ingest::ingestion::ingest_feed;
//! use gtfs_ingest::types::MemorySource;
//!
//! # fn main() -> Result<(), gtfs_ingest::IngestionError> {
//! let source = MemorySource::new()
//!     .with_rows("agency", &[
//!         &["agency_id", "agency_name", "agency_url", "agency_timezone"],
//!         &["M", "Metro", "https://metro.example", "Europe/Paris"],
//!     ])
//!     .with_rows("stops", &[
//!         &["stop_id", "stop_name", "stop_lat", "stop_lon"],
//!         &["S1", "Central", "48.85", "2.35"],
//!     ])
//!     .with_rows("routes", &[
//!         &["route_id", "agency_id", "route_short_name", "route_long_name", "route_type"],
//!         &["R1", "M", "1", "Line 1", "1"],
//!     ])
//!     .with_rows("trips", &[&["route_id", "service_id", "trip_id"], &["R1", "WK", "T1"]])
//!     .with_rows("stop_times", &[
//!         &["trip_id", "arrival_time", "departure_time", "stop_id", "stop_sequence"],
//!         &["T1", "08:00:00", "08:00:00", "S1", "1"],
//!     ])
//!     .with_rows("calendar", &[
//!         &["service_id", "monday", "tuesday", "wednesday", "thursday", "friday",
//!           "saturday", "sunday", "start_date", "end_date"],
//!         &["WK", "1", "1", "1", "1", "1", "0", "0", "20240101", "20241231"],
//!     ]);
//!
//! let feed = ingest_feed(&source)?;
//! assert_eq!(feed.routes[0].route_type, gtfs_ingest::enums::RouteType::Subway);
//! assert_eq!(feed.record_count(), 6);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the engine, the CSV directory source, and observer hooks
//! - [`schedule`]: dependency graph and table scheduler
//! - [`decode`]: header-indexed row decoding and the decoder registry
//! - [`coercion`]: raw string to typed value conversions
//! - [`records`], [`enums`]: the typed data model
//! - [`sink`]: record sinks and the in-memory [`sink::Feed`]
//! - [`types`]: headers, tables, and table sources
//! - [`error`]: error types used across ingestion

pub mod coercion;
pub mod decode;
pub mod enums;
pub mod error;
pub mod ingestion;
pub mod records;
pub mod schedule;
pub mod sink;
pub mod types;

pub use error::{CoercionError, CoercionResult, IngestionError, IngestionResult};
