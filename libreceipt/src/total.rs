use crate::amount;
use crate::store::{is_blank_row, Column};
use crate::table::Workbook;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

/// Why a booked row was left out of a rescan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unreadable,
    OutOfRange,
}

/// A booked row whose amount was not counted during a rescan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedRow {
    pub partition: String,
    pub row: usize,
    pub value: String,
    pub reason: SkipReason,
}

/// Adding `amount` would push the total past [`amount::LIMIT`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("running total cannot absorb {amount}")]
pub struct Overflow {
    pub amount: Decimal,
}

fn checked_sum(total: Decimal, value: Decimal) -> Option<Decimal> {
    total.checked_add(value).filter(amount::in_range)
}

/// Result of a full rescan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recount {
    pub total: Decimal,
    pub skipped: Vec<SkippedRow>,
}

/// Sum the amount column of every booked row in every partition.
///
/// Free rows (blank date) are ignored since the next append may overwrite
/// them. Booked rows with an unreadable amount, or one that would carry the
/// total out of range, are left out of the total and reported.
pub fn recount(book: &Workbook) -> Recount {
    let mut recount = Recount::default();

    for (name, partition) in book.partitions() {
        for (idx, row) in partition.rows().iter().enumerate() {
            if is_blank_row(row) {
                continue;
            }

            let cell = row
                .get(Column::Amount.index() - 1)
                .map(|c| c.trim())
                .unwrap_or_default();
            let reason = match amount::parse(cell) {
                Some(value) => match checked_sum(recount.total, value) {
                    Some(total) => {
                        recount.total = total;
                        continue;
                    }
                    None => SkipReason::OutOfRange,
                },
                None => SkipReason::Unreadable,
            };

            warn!(partition = name, row = idx + 1, value = cell, ?reason, "skipping amount");
            recount.skipped.push(SkippedRow {
                partition: name.to_string(),
                row: idx + 1,
                value: cell.to_string(),
                reason,
            });
        }
    }

    recount
}

/// Cached sum of every amount in the ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunningTotal(Decimal);

impl RunningTotal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// What the total would become with `amount` added, without changing it.
    pub fn sum_with(&self, amount: Decimal) -> Result<Decimal, Overflow> {
        checked_sum(self.0, amount).ok_or(Overflow { amount })
    }

    /// Account for a freshly booked amount. Only call once the booking has
    /// been saved. On overflow the total is left as it was.
    pub fn add(&mut self, amount: Decimal) -> Result<Decimal, Overflow> {
        self.0 = self.sum_with(amount)?;
        Ok(self.0)
    }

    /// Throw the cached value away and rebuild it from `book`.
    pub fn recompute(&mut self, book: &Workbook) -> Recount {
        let recount = recount(book);
        self.0 = recount.total;
        recount
    }
}

#[cfg(test)]
mod tests {
    use super::{recount, Overflow, RunningTotal, SkipReason, SkippedRow};
    use crate::amount::LIMIT;
    use crate::store::bootstrap;
    use crate::table::{Workbook, DEFAULT_PARTITION};
    use rust_decimal::Decimal;

    use anyhow::Result;

    fn book_row(book: &mut Workbook, partition: &str, row: usize, cells: [&str; 3]) -> Result<()> {
        for (idx, cell) in cells.iter().enumerate() {
            book.write_cell(partition, row, idx + 1, cell)?;
        }
        Ok(())
    }

    #[test]
    fn test_add() -> Result<()> {
        let mut total = RunningTotal::new();
        assert_eq!(total.add(Decimal::new(1250, 2))?, Decimal::new(1250, 2));
        assert_eq!(total.add(Decimal::new(749, 2))?, Decimal::new(1999, 2));
        assert_eq!(total.add(Decimal::new(-999, 2))?, Decimal::new(1000, 2));
        assert_eq!(total.value().to_string(), "10.00");
        Ok(())
    }

    #[test]
    fn test_add_without_drift() -> Result<()> {
        let mut total = RunningTotal::new();
        for _ in 0..1000 {
            total.add(Decimal::new(1, 1))?;
        }
        assert_eq!(total.value(), Decimal::new(100, 0));
        Ok(())
    }

    #[test]
    fn test_add_past_limit() -> Result<()> {
        let top = LIMIT - Decimal::new(1, 2);
        let mut total = RunningTotal::new();
        total.add(top)?;

        assert_eq!(total.sum_with(top), Err(Overflow { amount: top }));
        assert_eq!(total.add(Decimal::new(1, 2)), Err(Overflow { amount: Decimal::new(1, 2) }));
        assert_eq!(total.value(), top);

        assert_eq!(total.add(Decimal::new(-100, 2))?, top - Decimal::ONE);
        Ok(())
    }

    #[test]
    fn test_add_does_not_panic_at_decimal_max() {
        let mut total = RunningTotal::new();
        assert!(total.add(Decimal::MAX).is_err());
        assert!(total.add(Decimal::MIN).is_err());
        assert_eq!(total.value(), Decimal::ZERO);
    }

    #[test]
    fn test_recount_all_partitions() -> Result<()> {
        let mut book = Workbook::new();
        bootstrap(&mut book);
        book_row(&mut book, "jan", 1, ["January 15, 2024", "Cafe A", "12.50"])?;
        book_row(&mut book, "jan", 2, ["January 20, 2024", "Cafe B", "7.49"])?;
        book_row(&mut book, "dec", 1, ["December 01, 2024", "Refund", "-2.00"])?;
        book_row(&mut book, DEFAULT_PARTITION, 1, ["June 01, 2024", "Stray", "0.01"])?;

        let recount = recount(&book);
        assert_eq!(recount.total, Decimal::new(1800, 2));
        assert!(recount.skipped.is_empty());
        Ok(())
    }

    #[test]
    fn test_recount_reports_unreadable_rows() -> Result<()> {
        let mut book = Workbook::new();
        bootstrap(&mut book);
        book_row(&mut book, "may", 1, ["Date", "Payee", "Amount"])?;
        book_row(&mut book, "may", 2, ["May 02, 2024", "Deli", " 4.50 "])?;
        book.write_cell("may", 3, 1, "May 03, 2024")?;

        let recount = recount(&book);
        assert_eq!(recount.total, Decimal::new(450, 2));
        assert_eq!(
            recount.skipped,
            vec![
                SkippedRow {
                    partition: "may".to_string(),
                    row: 1,
                    value: "Amount".to_string(),
                    reason: SkipReason::Unreadable,
                },
                SkippedRow {
                    partition: "may".to_string(),
                    row: 3,
                    value: "".to_string(),
                    reason: SkipReason::Unreadable,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_recount_ignores_free_rows() -> Result<()> {
        let mut book = Workbook::new();
        bootstrap(&mut book);
        book_row(&mut book, "jul", 1, ["", "leftover", "99.00"])?;
        book_row(&mut book, "jul", 2, ["July 02, 2024", "Deli", "1.00"])?;

        let mut total = RunningTotal::new();
        let recount = total.recompute(&book);
        assert_eq!(recount.total, Decimal::new(100, 2));
        assert_eq!(total.value(), recount.total);
        Ok(())
    }

    #[test]
    fn test_recount_reports_out_of_range_rows() -> Result<()> {
        let mut book = Workbook::new();
        bootstrap(&mut book);
        book_row(&mut book, "aug", 1, ["August 01, 2024", "Deli", "1.00"])?;
        book_row(&mut book, "aug", 2, ["August 02, 2024", "Typo", "79228162514264337593543950335"])?;
        book_row(&mut book, "aug", 3, ["August 03, 2024", "Typo", "79228162514264337593543950335"])?;
        book_row(&mut book, "aug", 4, ["August 04, 2024", "Deli", "2.00"])?;

        let mut total = RunningTotal::new();
        let recount = total.recompute(&book);
        assert_eq!(recount.total, Decimal::new(300, 2));
        assert_eq!(total.value(), recount.total);
        let rows: Vec<(usize, SkipReason)> =
            recount.skipped.iter().map(|s| (s.row, s.reason)).collect();
        assert_eq!(rows, vec![(2, SkipReason::OutOfRange), (3, SkipReason::OutOfRange)]);
        Ok(())
    }
}
