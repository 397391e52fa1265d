use crate::{
    amount,
    entry::{Entry, RawEntry, ValidationError},
    store::{LedgerStore, Placement},
    table::{Table, TableError},
    total::{Overflow, Recount, RunningTotal},
};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger storage failed: {0}")]
    Storage(#[from] TableError),

    #[error("ledger lock poisoned by a panicked writer")]
    Poisoned,

    #[error(transparent)]
    Overflow(#[from] Overflow),
}

/// Answer for a submission that passed validation but was not booked.
pub const FAILURE_MESSAGE: &str = "Could not record entry, please try again";

/// Confirmation of a booked entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub total: Decimal,
    pub placement: Placement,
}

/// What became of a raw submission.
#[derive(Debug)]
pub enum Outcome {
    Recorded(Receipt),
    Rejected(ValidationError),
    Failed(LedgerError),
}

/// The text handed back to the submitter.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Recorded(receipt) => {
                write!(f, "OK. Running total: {}", amount::display(receipt.total))
            }
            Outcome::Rejected(e) => write!(f, "{}", e),
            Outcome::Failed(_) => f.write_str(FAILURE_MESSAGE),
        }
    }
}

struct State<T: Table> {
    store: LedgerStore<T>,
    total: RunningTotal,
}

/// Expense ledger with a running total.
///
/// Holding a `Ledger` means the month partitions exist and the running total
/// matches what was on the table at open time. Every operation touching the
/// table takes the same lock, so appends are applied one at a time and the
/// cached total moves in the same order as the rows.
pub struct Ledger<T: Table> {
    year: i32,
    state: Mutex<State<T>>,
}

impl<T: Table> Ledger<T> {
    /// Bootstrap the table and rebuild the running total from it. Entries
    /// submitted later are dated in `year`.
    ///
    /// A ledger that fails to open must not be served.
    pub fn open(table: T, year: i32) -> Result<Self, LedgerError> {
        let store = LedgerStore::new(table);
        store.ensure_partitions()?;

        let mut total = RunningTotal::new();
        let recount = total.recompute(&store.workbook()?);
        info!(
            total = %amount::display(recount.total),
            skipped = recount.skipped.len(),
            year,
            "ledger ready"
        );

        Ok(Self {
            year,
            state: Mutex::new(State { store, total }),
        })
    }

    fn state(&self) -> Result<MutexGuard<'_, State<T>>, LedgerError> {
        self.state.lock().map_err(|_| LedgerError::Poisoned)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn total(&self) -> Result<Decimal, LedgerError> {
        Ok(self.state()?.total.value())
    }

    /// Book a validated entry. The total only moves once the row is saved,
    /// and nothing is saved when the total could not take the amount.
    pub fn submit(&self, entry: &Entry) -> Result<Receipt, LedgerError> {
        let mut state = self.state()?;
        state.total.sum_with(entry.amount())?;
        let placement = state.store.append(entry)?;
        let total = state.total.add(entry.amount())?;
        Ok(Receipt { total, placement })
    }

    /// Validate and book raw submission fields.
    pub fn submit_entry(&self, raw: &RawEntry<'_>) -> Outcome {
        let entry = match raw.validate(self.year) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(date = raw.date, amount = raw.amount, "rejected: {}", e);
                return Outcome::Rejected(e);
            }
        };

        match self.submit(&entry) {
            Ok(receipt) => {
                info!(
                    date = %entry.date(),
                    payee = entry.payee(),
                    amount = %entry.amount(),
                    partition = receipt.placement.partition,
                    row = receipt.placement.row,
                    "entry recorded"
                );
                Outcome::Recorded(receipt)
            }
            Err(e) => {
                warn!(error = %e, "entry not recorded");
                Outcome::Failed(e)
            }
        }
    }

    /// Rebuild the running total from the table, picking up rows edited
    /// outside of this process.
    pub fn recompute(&self) -> Result<Recount, LedgerError> {
        let mut state = self.state()?;
        let book = state.store.workbook()?;

        let cached = state.total.value();
        let recount = state.total.recompute(&book);
        if recount.total != cached {
            warn!(
                cached = %amount::display(cached),
                recomputed = %amount::display(recount.total),
                "running total drifted from ledger"
            );
        }
        Ok(recount)
    }
}
