//! libreceipt - Month partitioned expense ledger
//! ---
//!
//! Receipts come in one at a time as `mm-dd`, payee and amount. Each one is
//! booked in the partition of its month (`jan` to `dec`) at the first free
//! row, saved, and added to a running total that always matches what is on
//! the table.
//!
//! ```no_run
//! use libreceipt::{JsonFileTable, Ledger, RawEntry};
//!
//! let ledger = Ledger::open(JsonFileTable::new("receipts.json"), 2024)?;
//! let outcome = ledger.submit_entry(&RawEntry::new("01-15", "Cafe A", "12.50"));
//! println!("{}", outcome);
//! # Ok::<(), libreceipt::LedgerError>(())
//! ```

extern crate pest;
#[macro_use]
extern crate pest_derive;

mod amount;

/// Submission validation.
pub mod entry;

/// Appending coordinator, the only way in for concurrent callers.
///
/// [`Ledger`][ledger::Ledger] owns the table and the running total behind one
/// lock. Opening it is the startup protocol: partitions are bootstrapped and
/// the total rebuilt before the first append is accepted.
pub mod ledger;

mod parser;

/// Month partitions and the insertion-point rule.
pub mod store;

/// Storage for the ledger workbook.
pub mod table;

/// Running total and full rescans.
pub mod total;

pub use amount::{display as display_amount, fixed_bank};
pub use entry::{validate, Entry, EntryDate, RawEntry, ValidationError};
pub use ledger::{Ledger, LedgerError, Outcome, Receipt, FAILURE_MESSAGE};
pub use store::{LedgerStore, Placement};
pub use table::{JsonFileTable, MemoryTable, Table, TableError, Workbook};
pub use total::{Overflow, Recount, RunningTotal, SkipReason, SkippedRow};
