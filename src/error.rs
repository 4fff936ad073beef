use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for single-field coercions.
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Error type returned by ingestion functions.
///
/// Every variant is fatal to the run: the engine never skips a row or a table and never retries.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error while reading a table from its source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV tokenization error raised by a CSV-backed source.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Failure while enumerating the files of a feed directory.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A table every feed must contain is absent from the source.
    #[error("missing required table '{table}'")]
    MissingRequiredTable { table: String },

    /// A source holds more than one table under the same (case-insensitive) name.
    #[error("duplicate table '{table}' in source")]
    DuplicateTable { table: String },

    /// A full scheduling pass selected nothing while tables were still unread.
    ///
    /// Either the dependency graph has a cycle among the present tables, or a present table
    /// depends on a table the source does not contain.
    #[error("scheduling deadlock: no table can be decoded next (pending={pending:?})")]
    SchedulingDeadlock { pending: Vec<String> },

    /// A non-empty table's header lacks a column its entity kind requires.
    #[error("table '{table}' is missing required field '{field}'")]
    MissingRequiredField { table: String, field: String },

    /// A field value could not be coerced into its typed representation.
    #[error("failed to parse field '{field}' of table '{table}': {cause} (raw='{raw}')")]
    FieldParse {
        table: String,
        field: String,
        raw: String,
        #[source]
        cause: CoercionError,
    },
}

/// Why a single raw value was rejected by a coercion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The field is mandatory-valued and the raw value was empty or whitespace.
    #[error("value is required but was empty")]
    Empty,

    #[error("expected boolean flag '0' or '1'")]
    InvalidBool,

    #[error("invalid unsigned integer: {0}")]
    InvalidInteger(#[from] ParseIntError),

    /// A leading `+` on an unsigned integer literal.
    #[error("unsigned integer must not carry a sign")]
    SignedInteger,

    #[error("invalid decimal number: {0}")]
    InvalidDouble(#[from] ParseFloatError),

    /// The value parsed, but to an infinity or NaN.
    #[error("decimal number is not finite")]
    NonFiniteDouble,

    #[error("invalid color: {reason}")]
    InvalidColor { reason: String },

    /// The code is not one of the closed set defined for the enumeration.
    #[error("unknown {kind} code '{code}'")]
    UnknownCode { kind: &'static str, code: String },
}
