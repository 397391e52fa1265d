use crate::{amount, entry::Entry};
use crate::table::{Table, TableError, Workbook, DEFAULT_PARTITION};
use tracing::{debug, info};

/// Month partitions, in calendar order.
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Target for a month outside 1..=12. Validated entries never land here.
pub const FALLBACK_PARTITION: &str = DEFAULT_PARTITION;

/// Display widths for the date, payee and amount columns.
pub const COLUMN_WIDTHS: [f64; 3] = [20.0, 32.0, 10.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Date = 1,
    Payee = 2,
    Amount = 3,
}

impl Column {
    /// 1-based column index.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where an entry was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub partition: &'static str,
    pub row: usize,
}

pub fn resolve_partition(month: u32) -> &'static str {
    usize::try_from(month)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|idx| MONTHS.get(idx))
        .copied()
        .unwrap_or(FALLBACK_PARTITION)
}

/// A row is free for reuse when its date cell is missing or blank.
pub fn is_blank_row(row: &[String]) -> bool {
    row.first().map_or(true, |cell| cell.trim().is_empty())
}

/// 1-based index of the first free row in `partition`, or one past the end
/// if every row is taken.
pub fn find_insertion_row(book: &Workbook, partition: &str) -> Result<usize, TableError> {
    let rows = book.rows(partition)?;
    Ok(rows
        .iter()
        .position(|row| is_blank_row(row))
        .map(|idx| idx + 1)
        .unwrap_or(rows.len() + 1))
}

/// Add any missing month partitions unless `jan` is already there.
/// Returns whether the workbook changed.
pub fn bootstrap(book: &mut Workbook) -> bool {
    if book.has_partition(MONTHS[0]) {
        return false;
    }

    for month in MONTHS {
        book.add_partition(month, &COLUMN_WIDTHS);
    }
    true
}

/// Month-partitioned expense table on top of a [`Table`].
///
/// Every call reopens the table and, when it mutates, saves it whole. The
/// store holds no state of its own and does no locking, callers serialize
/// access.
#[derive(Debug)]
pub struct LedgerStore<T: Table> {
    table: T,
}

impl<T: Table> LedgerStore<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    /// Create the month partitions if this is a fresh ledger. Saves only
    /// when something was created.
    pub fn ensure_partitions(&self) -> Result<bool, TableError> {
        let mut book = self.table.open()?;
        if !bootstrap(&mut book) {
            return Ok(false);
        }

        info!("setting up month partitions");
        self.table.save(&book)?;
        Ok(true)
    }

    /// Current saved contents, for scanning.
    pub fn workbook(&self) -> Result<Workbook, TableError> {
        self.table.open()
    }

    /// Write `entry` at the first free row of its month and save.
    pub fn append(&self, entry: &Entry) -> Result<Placement, TableError> {
        let mut book = self.table.open()?;
        if bootstrap(&mut book) {
            info!("month partitions were missing, recreated before append");
        }

        let partition = resolve_partition(entry.date().month());
        let row = find_insertion_row(&book, partition)?;

        book.write_cell(partition, row, Column::Date.index(), &entry.date().to_string())?;
        book.write_cell(partition, row, Column::Payee.index(), entry.payee())?;
        book.write_cell(
            partition,
            row,
            Column::Amount.index(),
            &amount::display(entry.amount()),
        )?;
        self.table.save(&book)?;

        debug!(partition, row, payee = entry.payee(), "entry booked");
        Ok(Placement { partition, row })
    }
}
