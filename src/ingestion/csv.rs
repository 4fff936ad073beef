//! CSV-backed feed source: one `<table>.txt` file per table in a directory.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Row, RowIter, TableSource};

const TABLE_EXTENSIONS: [&str; 2] = ["txt", "csv"];

/// A [`TableSource`] reading a feed directory.
///
/// Rules:
///
/// - every `*.txt` / `*.csv` file directly inside the directory is a table named by its file stem
/// - two files whose stems differ only in case or extension are rejected as the same table
/// - tables are listed in file-name order
/// - rows are streamed one record at a time; ragged rows are allowed
/// - a UTF-8 byte order mark before the first header cell is dropped
pub struct CsvDirectorySource {
    root: PathBuf,
    files: Vec<(String, PathBuf)>,
}

impl CsvDirectorySource {
    /// Enumerate the tables of the feed directory at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> IngestionResult<Self> {
        let root = dir.as_ref().to_path_buf();
        let mut files: Vec<(String, PathBuf)> = Vec::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_table = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| TABLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !is_table {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if files.iter().any(|(n, _)| n.eq_ignore_ascii_case(stem)) {
                return Err(IngestionError::DuplicateTable {
                    table: stem.to_string(),
                });
            }
            files.push((stem.to_string(), path.to_path_buf()));
        }

        tracing::debug!(root = %root.display(), tables = files.len(), "opened feed directory");
        Ok(Self { root, files })
    }

    /// Directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
    }
}

impl fmt::Debug for CsvDirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvDirectorySource")
            .field("root", &self.root)
            .field("tables", &self.files.len())
            .finish()
    }
}

impl TableSource for CsvDirectorySource {
    fn table_names(&self) -> Vec<String> {
        self.files.iter().map(|(n, _)| n.clone()).collect()
    }

    fn open(&self, name: &str) -> IngestionResult<RowIter<'_>> {
        let path = self.path_of(name).ok_or_else(|| {
            IngestionError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no file for table '{name}' in {}", self.root.display()),
            ))
        })?;

        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut first = true;
        Ok(Box::new(rdr.into_records().map(move |record| -> IngestionResult<Row> {
            let record = record?;
            let mut row: Row = record.iter().map(str::to_owned).collect();
            if first {
                first = false;
                if let Some(cell) = row.first_mut() {
                    if let Some(stripped) = cell.strip_prefix('\u{feff}') {
                        *cell = stripped.to_owned();
                    }
                }
            }
            Ok(row)
        })))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
