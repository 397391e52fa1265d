use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Fractional digits kept for every amount written to the ledger.
pub const PLACES: u32 = 2;

/// Amounts and the running total stay strictly below 10^24 in magnitude, so
/// sums of two-place values never lose their cents.
pub const LIMIT: Decimal = Decimal::from_parts(0xA100_0000, 0x1BCE_CCED, 0xD3C2, false, 0);

/// Parse plain (`-12.50`) or scientific (`1.25e1`) decimal text.
pub fn parse(raw: &str) -> Option<Decimal> {
    // rust_decimal takes `_` as a digit separator
    if raw.contains('_') {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Round half to even at two places, padding so the scale is exactly two
/// (`12.5` becomes `12.50`, `2.345` becomes `2.34`).
pub fn fixed_bank(value: Decimal) -> Decimal {
    let mut fixed = value.round_dp_with_strategy(PLACES, RoundingStrategy::MidpointNearestEven);
    fixed.rescale(PLACES);
    fixed
}

pub fn in_range(value: &Decimal) -> bool {
    value.abs() < LIMIT
}

pub fn display(value: Decimal) -> String {
    fixed_bank(value).to_string()
}
