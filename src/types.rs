//! Core tabular input types.
//!
//! A feed is a set of named [`Table`]s handed out by a [`TableSource`]. Each table is a
//! forward-only sequence of already-tokenized rows whose first row is the [`Header`].

use crate::error::IngestionResult;

/// One tokenized row: column strings in physical order.
pub type Row = Vec<String>;

/// Forward-only row sequence of a single table.
pub type RowIter<'a> = Box<dyn Iterator<Item = IngestionResult<Row>> + 'a>;

/// Column names of a table, as they appear physically in its first row.
///
/// Column-name matching is exact and case-sensitive. Names need not be unique; lookups by name
/// return the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    table: String,
    columns: Vec<String>,
}

impl Header {
    /// Build a header from a table's first row.
    pub fn from_row(table: impl Into<String>, first_row: &[String]) -> Self {
        Self {
            table: table.into(),
            columns: first_row.to_vec(),
        }
    }

    /// Name of the table this header belongs to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Iterate column names in physical order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Returns the position of the first column called `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the column name at `index`, if the header is that wide.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.as_str())
    }
}

/// A single table handed to a decoder.
///
/// `rows` yields the header row first, then zero or more data rows. A table with no rows at all
/// is valid and decodes to nothing.
pub struct Table<'a> {
    /// Table name as reported by the source.
    pub name: &'a str,
    /// Forward-only rows, header first.
    pub rows: RowIter<'a>,
}

impl<'a> Table<'a> {
    pub fn new(name: &'a str, rows: RowIter<'a>) -> Self {
        Self { name, rows }
    }
}

/// Supplier of the named tables making up one feed.
///
/// Implementations only enumerate and open tables; they never interpret rows. A table is opened
/// when the scheduler selects it, so sources may stream lazily from disk.
pub trait TableSource {
    /// Names of the tables present, in source order.
    fn table_names(&self) -> Vec<String>;

    /// Open `name` for a single forward pass.
    fn open(&self, name: &str) -> IngestionResult<RowIter<'_>>;

    /// Short human-readable description used in logs and observer callbacks.
    fn describe(&self) -> String {
        "table source".to_string()
    }
}

/// A [`TableSource`] holding every table in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySource {
    tables: Vec<(String, Vec<Row>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Rows include the header as the first row.
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert(name, rows);
        self
    }

    /// Add a table from string slices, header first.
    pub fn with_rows(self, name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.with_table(name, rows)
    }

    /// Add or replace a table, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        let name = name.into();
        match self.tables.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = rows,
            None => self.tables.push((name, rows)),
        }
    }

    /// Remove a table, returning its rows if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Vec<Row>> {
        let idx = self.tables.iter().position(|(n, _)| n == name)?;
        Some(self.tables.remove(idx).1)
    }
}

impl TableSource for MemorySource {
    fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|(n, _)| n.clone()).collect()
    }

    fn open(&self, name: &str) -> IngestionResult<RowIter<'_>> {
        let rows = self
            .tables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or_default();
        Ok(Box::new(rows.iter().cloned().map(Ok)))
    }

    fn describe(&self) -> String {
        format!("memory ({} tables)", self.tables.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{Header, MemorySource, TableSource};

    fn header(cols: &[&str]) -> Header {
        let row: Vec<String> = cols.iter().map(|c| c.to_string()).collect();
        Header::from_row("stops", &row)
    }

    #[test]
    fn header_lookups_by_name_and_index() {
        let h = header(&["stop_id", "stop_name", "stop_lat"]);
        assert_eq!(h.table(), "stops");
        assert_eq!(h.len(), 3);
        assert_eq!(h.index_of("stop_name"), Some(1));
        assert_eq!(h.index_of("missing"), None);
        assert_eq!(h.name_at(2), Some("stop_lat"));
        assert_eq!(h.name_at(3), None);
        assert!(h.has_column("stop_id"));
    }

    #[test]
    fn header_matching_is_case_sensitive() {
        let h = header(&["Stop_Id"]);
        assert!(!h.has_column("stop_id"));
        assert!(h.has_column("Stop_Id"));
    }

    #[test]
    fn duplicate_columns_resolve_to_first_occurrence() {
        let h = header(&["a", "b", "a"]);
        assert_eq!(h.index_of("a"), Some(0));
        assert_eq!(h.name_at(2), Some("a"));
    }

    #[test]
    fn memory_source_preserves_insertion_order_and_replaces_in_place() {
        let mut src = MemorySource::new()
            .with_rows("b", &[&["x"]])
            .with_rows("a", &[&["y"]]);
        src.insert("b", vec![vec!["z".to_string()]]);

        assert_eq!(src.table_names(), vec!["b".to_string(), "a".to_string()]);
        let rows: Vec<_> = src.open("b").unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![vec!["z".to_string()]]);
    }

    #[test]
    fn memory_source_opens_unknown_table_as_empty() {
        let src = MemorySource::new();
        assert_eq!(src.open("nope").unwrap().count(), 0);
    }
}
