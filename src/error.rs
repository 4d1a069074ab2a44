use crate::query::QueryErr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Query(#[from] QueryErr),

    // dispatch
    #[error("table '{name}' already exists")]
    TableAlreadyExists { name: String },
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
    #[error("table name '{name}' uses the reserved prefix '{prefix}'")]
    ReservedName { name: String, prefix: &'static str },
    #[error("malformed command tree: {0}")]
    MalformedTree(String),

    // storage
    #[error("no such table: {name}")]
    NoSuchTable { name: String },
    #[error("table '{table}' has {expected} columns but {actual} values were given")]
    ArityMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },
    #[error("document '{}' is corrupt: {detail}", .path.display())]
    CorruptDocument { path: PathBuf, detail: String },

    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
