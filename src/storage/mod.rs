mod document;
mod memory;

pub use document::Document;
pub use memory::MemoryStorage;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tables whose names start with this prefix belong to the storage layer.
pub const INTERNAL_PREFIX: &str = "ghostdb_";

/// Table store the engine dispatches parsed commands to.
pub trait Storage {
    fn table_exists(&self, name: &str) -> bool;

    /// Creates an empty table. Fails with `TableAlreadyExists` if `name` is taken.
    fn create_table(&mut self, name: &str, columns: &[String]) -> Result<()>;

    /// Appends one row. The number of values must match the column count.
    fn append_row(&mut self, table: &str, values: &[String]) -> Result<()>;

    /// User table names in ascending order.
    fn table_names(&self) -> Vec<String>;
}

/// A named table: header columns and rows of text cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[String]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, values: &[String]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::ArityMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: values.len(),
            });
        }
        self.rows.push(values.to_vec());
        Ok(())
    }
}
