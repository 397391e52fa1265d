use super::{Table, TableError, Workbook};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Slot {
    book: Option<Workbook>,
    saves: usize,
    failing_loads: bool,
    failing_saves: bool,
}

/// Table kept in process memory, for tests and embedding.
///
/// Clones share the same saved workbook, so a test can keep a handle while
/// the ledger owns another. Loads and saves can be made to fail on demand.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable(Arc<Mutex<Slot>>);

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(book: Workbook) -> Self {
        let table = Self::new();
        table.slot().book = Some(book);
        table
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        // the slot is only ever replaced whole, a poisoned guard is still consistent
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last saved workbook.
    pub fn saved(&self) -> Option<Workbook> {
        self.slot().book.clone()
    }

    /// Number of successful saves so far.
    pub fn saves(&self) -> usize {
        self.slot().saves
    }

    pub fn fail_loads(&self, failing: bool) {
        self.slot().failing_loads = failing;
    }

    pub fn fail_saves(&self, failing: bool) {
        self.slot().failing_saves = failing;
    }
}

impl Table for MemoryTable {
    fn load(&self) -> Result<Option<Workbook>, TableError> {
        let slot = self.slot();
        if slot.failing_loads {
            return Err(TableError::Unavailable("load refused".to_string()));
        }
        Ok(slot.book.clone())
    }

    fn save(&self, book: &Workbook) -> Result<(), TableError> {
        let mut slot = self.slot();
        if slot.failing_saves {
            return Err(TableError::Unavailable("save refused".to_string()));
        }
        slot.book = Some(book.clone());
        slot.saves += 1;
        Ok(())
    }
}
