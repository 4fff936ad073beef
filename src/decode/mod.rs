//! Table decoding: header-indexed dispatch of raw rows into typed records.
//!
//! Each entity kind is described by two pieces of data, an [`EntitySchema`]:
//!
//! - the required column names, checked once against the header
//! - a column-name -> setter table, where each setter runs one coercion and assigns the result
//!
//! [`EntityDecoder`] turns a schema into a [`TableDecoder`], and [`DecoderRegistry`] maps table
//! names to decoders. Adding a table is a matter of registering another decoder.
//!
//! ```rust
//! use gtfs_ingest::decode::DecoderRegistry;
//! use gtfs_ingest::sink::Feed;
//! use gtfs_ingest::types::{MemorySource, Table, TableSource};
//!
//! # fn main() -> Result<(), gtfs_ingest::IngestionError> {
//! let source = MemorySource::new().with_rows(
//!     "agency",
//!     &[
//!         &["agency_name", "agency_url", "agency_timezone"],
//!         &["Metro", "https://metro.example", "Europe/Paris"],
//!     ],
//! );
//!
//! let registry = DecoderRegistry::gtfs();
//! let mut feed = Feed::new();
//! let decoder = registry.get("AGENCY").expect("table names are case-insensitive");
//! let n = decoder.decode(Table::new("agency", source.open("agency")?), &mut feed)?;
//!
//! assert_eq!(n, 1);
//! assert_eq!(feed.agencies[0].agency_name, "Metro");
//! # Ok(())
//! # }
//! ```

mod entities;

use std::collections::HashMap;
use std::fmt;

use crate::error::{CoercionResult, IngestionError, IngestionResult};
use crate::sink::FeedSink;
use crate::types::{Header, Table};

pub use entities::{
    agency_schema, calendar_date_schema, calendar_schema, fare_attribute_schema, fare_rule_schema,
    feed_info_schema, frequency_schema, route_schema, shape_schema, stop_schema,
    stop_time_schema, transfer_schema, trip_schema,
};

/// Coerce one raw value and assign it into a record.
pub type FieldSetter<K> = fn(&mut K, &str) -> CoercionResult<()>;

/// A record type the decoder can build row by row.
pub trait Entity: Default + 'static {
    /// Hand the finished record to the sink.
    fn deliver(self, sink: &mut dyn FeedSink);
}

/// Decodes one whole table and pushes its records into a sink.
pub trait TableDecoder: Send + Sync {
    /// Decode `table` to completion, returning the number of records pushed.
    ///
    /// The first failure aborts the table; records already pushed stay pushed.
    fn decode(&self, table: Table<'_>, sink: &mut dyn FeedSink) -> IngestionResult<usize>;
}

/// Required columns and field setters of one entity kind.
pub struct EntitySchema<K> {
    table: &'static str,
    required: Vec<&'static str>,
    setters: HashMap<&'static str, FieldSetter<K>>,
}

impl<K> EntitySchema<K> {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            required: Vec::new(),
            setters: HashMap::new(),
        }
    }

    /// Append required column names. Order decides which missing name is reported first.
    pub fn required(mut self, names: &[&'static str]) -> Self {
        self.required.extend_from_slice(names);
        self
    }

    /// Register the setter for column `name`, replacing any previous one.
    pub fn field(mut self, name: &'static str, setter: FieldSetter<K>) -> Self {
        self.setters.insert(name, setter);
        self
    }

    /// Canonical table name this schema decodes.
    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn required_fields(&self) -> &[&'static str] {
        &self.required
    }

    pub fn setter(&self, column: &str) -> Option<FieldSetter<K>> {
        self.setters.get(column).copied()
    }

    /// Number of recognized columns.
    pub fn field_count(&self) -> usize {
        self.setters.len()
    }
}

impl<K> fmt::Debug for EntitySchema<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.setters.keys().collect();
        fields.sort();
        f.debug_struct("EntitySchema")
            .field("table", &self.table)
            .field("required", &self.required)
            .field("fields", &fields)
            .finish()
    }
}

/// Check that `header` has every column in `required`, walking the list in order.
///
/// Repeated names are harmless. Fails on the first absent name.
pub fn validate_required(header: &Header, required: &[&str]) -> IngestionResult<()> {
    match required.iter().find(|name| !header.has_column(name)) {
        Some(missing) => Err(IngestionError::MissingRequiredField {
            table: header.table().to_string(),
            field: (*missing).to_string(),
        }),
        None => Ok(()),
    }
}

/// Generic [`TableDecoder`] driven by an [`EntitySchema`].
#[derive(Debug)]
pub struct EntityDecoder<K> {
    schema: EntitySchema<K>,
}

impl<K: Entity> EntityDecoder<K> {
    pub fn new(schema: EntitySchema<K>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &EntitySchema<K> {
        &self.schema
    }
}

impl<K: Entity> TableDecoder for EntityDecoder<K> {
    fn decode(&self, table: Table<'_>, sink: &mut dyn FeedSink) -> IngestionResult<usize> {
        let Table { name, mut rows } = table;

        let header = match rows.next() {
            Some(first) => Header::from_row(name, &first?),
            None => return Ok(0),
        };

        // Setter per physical position; duplicate column names each get one, so the rightmost
        // assignment wins.
        let setters: Vec<Option<FieldSetter<K>>> =
            header.columns().map(|c| self.schema.setter(c)).collect();

        let mut validated = false;
        let mut count = 0usize;
        for row in rows {
            let row = row?;
            if !validated {
                validate_required(&header, &self.schema.required)?;
                validated = true;
            }

            // A short row reads as empty cells up to the header width; extra cells are ignored.
            let mut record = K::default();
            for (idx, setter) in setters.iter().enumerate() {
                let Some(setter) = setter else {
                    continue;
                };
                let raw = row.get(idx).map_or("", String::as_str);
                setter(&mut record, raw).map_err(|cause| IngestionError::FieldParse {
                    table: name.to_string(),
                    field: header.name_at(idx).unwrap_or_default().to_string(),
                    raw: raw.to_string(),
                    cause,
                })?;
            }

            record.deliver(sink);
            count += 1;
        }

        Ok(count)
    }
}

/// Case-insensitive map from table name to decoder.
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Box<dyn TableDecoder>>,
}

impl DecoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with decoders for the thirteen standard feed tables.
    pub fn gtfs() -> Self {
        let mut registry = Self::new();
        registry.register_schema(agency_schema());
        registry.register_schema(stop_schema());
        registry.register_schema(route_schema());
        registry.register_schema(trip_schema());
        registry.register_schema(stop_time_schema());
        registry.register_schema(calendar_schema());
        registry.register_schema(calendar_date_schema());
        registry.register_schema(fare_attribute_schema());
        registry.register_schema(fare_rule_schema());
        registry.register_schema(shape_schema());
        registry.register_schema(frequency_schema());
        registry.register_schema(feed_info_schema());
        registry.register_schema(transfer_schema());
        registry
    }

    /// Register `decoder` under `table`, replacing any decoder already registered for it.
    pub fn register(&mut self, table: &str, decoder: Box<dyn TableDecoder>) {
        self.decoders.insert(table.to_ascii_lowercase(), decoder);
    }

    /// Register an [`EntityDecoder`] under its schema's table name.
    pub fn register_schema<K: Entity>(&mut self, schema: EntitySchema<K>) {
        let table = schema.table();
        self.register(table, Box::new(EntityDecoder::new(schema)));
    }

    pub fn get(&self, table: &str) -> Option<&dyn TableDecoder> {
        self.decoders
            .get(&table.to_ascii_lowercase())
            .map(|d| d.as_ref())
    }

    pub fn contains(&self, table: &str) -> bool {
        self.get(table).is_some()
    }

    /// Registered table names (lowercase), sorted.
    pub fn tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("tables", &self.tables())
            .finish()
    }
}
