use super::{Sheet, Storage};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    sheets: BTreeMap<String, Sheet>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.sheets.get(table).map(|s| s.columns.as_slice())
    }

    pub fn rows(&self, table: &str) -> Option<&[Vec<String>]> {
        self.sheets.get(table).map(|s| s.rows.as_slice())
    }
}

impl Storage for MemoryStorage {
    fn table_exists(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    fn create_table(&mut self, name: &str, columns: &[String]) -> Result<()> {
        if self.table_exists(name) {
            return Err(Error::TableAlreadyExists {
                name: name.to_string(),
            });
        }
        self.sheets.insert(name.to_string(), Sheet::new(name, columns));
        Ok(())
    }

    fn append_row(&mut self, table: &str, values: &[String]) -> Result<()> {
        self.sheets
            .get_mut(table)
            .ok_or_else(|| Error::NoSuchTable {
                name: table.to_string(),
            })?
            .push_row(values)
    }

    fn table_names(&self) -> Vec<String> {
        self.sheets.keys().cloned().collect()
    }
}
