#![no_main]

use libfuzzer_sys::fuzz_target;
use libreceipt::{validate, ValidationError};

// Input is `date\npayee\namount`.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut fields = input.splitn(3, '\n');
    let date = fields.next().unwrap_or_default();
    let payee = fields.next().unwrap_or_default();
    let amount = fields.next().unwrap_or_default();

    match validate(date, payee, amount, 2024) {
        Ok(entry) => {
            assert!((1..=12).contains(&entry.date().month()));
            assert!((1..=31).contains(&entry.date().day()));
            assert!(!entry.payee().trim().is_empty());
            assert_eq!(entry.amount().scale(), 2);
        }
        Err(ValidationError::BadDateFormat)
        | Err(ValidationError::AmountUnparseable)
        | Err(ValidationError::EmptyPayee) => {}
    }
});
