use super::{Table, TableError, Workbook};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Workbook stored as one pretty-printed JSON file, readable and editable by
/// hand. Saves go through a temporary file and a rename so a crash never
/// leaves a half-written ledger behind.
#[derive(Clone, Debug)]
pub struct JsonFileTable {
    path: PathBuf,
}

impl JsonFileTable {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling the next save is written to, `<file name>.tmp`. Never the
    /// ledger itself, whatever its extension.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn io_error(&self, source: std::io::Error) -> TableError {
        TableError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Table for JsonFileTable {
    fn load(&self) -> Result<Option<Workbook>, TableError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let book = serde_json::from_slice(&bytes).map_err(|source| TableError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(book))
    }

    fn save(&self, book: &Workbook) -> Result<(), TableError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let bytes = serde_json::to_vec_pretty(book).map_err(|source| TableError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path).map_err(|e| self.io_error(e))?;
        file.write_all(&bytes).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), bytes = bytes.len(), "ledger saved");
        Ok(())
    }
}
