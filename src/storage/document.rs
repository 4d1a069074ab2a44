use super::{INTERNAL_PREFIX, Sheet, Storage};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const METADATA_SHEET: &str = "ghostdb_metadata";
const FORMAT_VERSION: &str = "0.0.1";

// On-disk layout. `checksum` is the CRC-32 of the JSON encoding of `sheets`.
#[derive(Serialize, Deserialize)]
struct DocumentFile {
    checksum: u32,
    sheets: Vec<Sheet>,
}

fn checksum(sheets: &[Sheet]) -> Result<u32> {
    Ok(crc32fast::hash(&serde_json::to_vec(sheets)?))
}

fn metadata_sheet() -> Sheet {
    let mut sheet = Sheet::new(METADATA_SHEET, &["version".to_string(), "name".to_string()]);
    sheet.rows.push(vec![FORMAT_VERSION.into(), "ghostdb".into()]);
    sheet
}

/// A file-backed collection of sheets. Every mutation is written through to
/// disk before it returns.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    sheets: Vec<Sheet>,
}

impl Document {
    /// Opens the document at `path`, creating it if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let document = Self {
                path,
                sheets: vec![metadata_sheet()],
            };
            document.save()?;
            info!(path = %document.path.display(), "created document");
            return Ok(document);
        }

        let file: DocumentFile = serde_json::from_slice(&fs::read(&path)?)?;
        let actual = checksum(&file.sheets)?;
        if actual != file.checksum {
            return Err(Error::CorruptDocument {
                path,
                detail: format!("checksum {actual:#010x} does not match stored {:#010x}", file.checksum),
            });
        }
        let mut document = Self {
            path,
            sheets: file.sheets,
        };
        if !document.sheets.iter().any(|s| s.name == METADATA_SHEET) {
            document.sheets.push(metadata_sheet());
            document.save()?;
        }
        info!(
            path = %document.path.display(),
            sheets = document.sheets.len(),
            "loaded document"
        );
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format version recorded in the metadata sheet.
    pub fn version(&self) -> Option<&str> {
        let sheet = self.sheet(METADATA_SHEET)?;
        let column = sheet.columns.iter().position(|c| c == "version")?;
        sheet.rows.first()?.get(column).map(String::as_str)
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.sheet(table).map(|s| s.columns.as_slice())
    }

    pub fn rows(&self, table: &str) -> Option<&[Vec<String>]> {
        self.sheet(table).map(|s| s.rows.as_slice())
    }

    fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn save(&self) -> Result<()> {
        let file = DocumentFile {
            checksum: checksum(&self.sheets)?,
            sheets: self.sheets.clone(),
        };
        // write then rename so a failed write never truncates the document
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&file)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), checksum = file.checksum, "saved document");
        Ok(())
    }
}

impl Storage for Document {
    fn table_exists(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    fn create_table(&mut self, name: &str, columns: &[String]) -> Result<()> {
        if self.table_exists(name) {
            return Err(Error::TableAlreadyExists {
                name: name.to_string(),
            });
        }
        self.sheets.push(Sheet::new(name, columns));
        if let Err(err) = self.save() {
            self.sheets.pop();
            return Err(err);
        }
        info!(table = name, columns = columns.len(), "created table");
        Ok(())
    }

    fn append_row(&mut self, table: &str, values: &[String]) -> Result<()> {
        let sheet = self
            .sheets
            .iter_mut()
            .find(|s| s.name == table)
            .ok_or_else(|| Error::NoSuchTable {
                name: table.to_string(),
            })?;
        sheet.push_row(values)?;
        if let Err(err) = self.save() {
            if let Some(sheet) = self.sheets.iter_mut().find(|s| s.name == table) {
                sheet.rows.pop();
            }
            return Err(err);
        }
        Ok(())
    }

    fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .sheets
            .iter()
            .filter(|s| !s.name.starts_with(INTERNAL_PREFIX))
            .map(|s| s.name.clone())
            .collect();
        names.sort();
        names
    }
}
