//! Persistent tabular storage.
//!
//! The ledger lives in a [`Workbook`]: named partitions holding rows of text
//! cells. A [`Table`] adapter only knows how to load and save a whole
//! workbook, every mutation is done on the loaded copy and written back as a
//! unit. Adapters give no protection against concurrent writers.

mod json;
mod memory;
mod workbook;

pub use json::JsonFileTable;
pub use memory::MemoryTable;
pub use workbook::{Partition, Workbook, DEFAULT_PARTITION};

use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("cannot access `{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed ledger file `{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("partition `{0}' does not exist")]
    MissingPartition(String),

    #[error("invalid cell address row {row}, column {column}")]
    InvalidCell { row: usize, column: usize },

    #[error("table unavailable: {0}")]
    Unavailable(String),
}

/// Durable home of a [`Workbook`].
pub trait Table: Send {
    /// Read the saved workbook, `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Workbook>, TableError>;

    /// Replace the saved workbook.
    fn save(&self, book: &Workbook) -> Result<(), TableError>;

    /// Read the saved workbook, creating and saving an empty one when absent.
    fn open(&self) -> Result<Workbook, TableError> {
        if let Some(book) = self.load()? {
            return Ok(book);
        }

        info!("creating new ledger workbook");
        let book = Workbook::new();
        self.save(&book)?;
        Ok(book)
    }
}
