use crate::{amount, parser};
use chrono::Month;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Reasons a raw submission is refused. The messages are shown to the
/// submitter as-is.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date format. Please use mm-dd")]
    BadDateFormat,
    #[error("Cannot read Amount")]
    AmountUnparseable,
    #[error("Missing payee")]
    EmptyPayee,
}

/// Calendar position of an entry.
///
/// Day is only bounded to 1..=31, so `February 31` is a valid `EntryDate`
/// and is booked under February.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryDate {
    year: i32,
    month: u32,
    day: u32,
}

impl EntryDate {
    pub fn new(year: i32, month: u32, day: u32) -> Option<EntryDate> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return None;
        }
        Some(EntryDate { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

/// Formats as `January 02, 2006`.
impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}, {:04}", self.month_name(), self.day, self.year)
    }
}

/// A validated expense, ready to be booked.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    date: EntryDate,
    payee: String,
    amount: Decimal,
}

impl Entry {
    pub fn new(date: EntryDate, payee: &str, amount: Decimal) -> Entry {
        Entry {
            date,
            payee: payee.to_string(),
            amount: amount::fixed_bank(amount),
        }
    }

    pub fn date(&self) -> EntryDate {
        self.date
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Undecoded submission fields, exactly as received.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEntry<'r> {
    pub date: &'r str,
    pub payee: &'r str,
    pub amount: &'r str,
}

impl<'r> RawEntry<'r> {
    pub fn new(date: &'r str, payee: &'r str, amount: &'r str) -> RawEntry<'r> {
        RawEntry {
            date,
            payee,
            amount,
        }
    }

    pub fn validate(&self, year: i32) -> Result<Entry, ValidationError> {
        validate(self.date, self.payee, self.amount, year)
    }
}

/// Turn raw submission fields into an [`Entry`] dated in `year`.
///
/// The amount is checked before the date, the payee last. Amounts whose
/// magnitude reaches [`amount::LIMIT`] are refused as unreadable.
pub fn validate(
    raw_date: &str,
    payee: &str,
    raw_amount: &str,
    year: i32,
) -> Result<Entry, ValidationError> {
    let amount = amount::parse(raw_amount)
        .map(amount::fixed_bank)
        .filter(amount::in_range)
        .ok_or(ValidationError::AmountUnparseable)?;

    let (month, day) = parser::month_day(raw_date).ok_or(ValidationError::BadDateFormat)?;
    let date = EntryDate::new(year, month, day).ok_or(ValidationError::BadDateFormat)?;

    if payee.trim().is_empty() {
        return Err(ValidationError::EmptyPayee);
    }

    Ok(Entry::new(date, payee, amount))
}
