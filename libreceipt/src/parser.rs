use pest::iterators::Pair;
use pest::Parser;

#[derive(Parser)]
#[grammar = "submission.pest"]
pub struct SubmissionParser;

/// Split a raw `mm-dd` date into its month and day components.
///
/// Only the shape is checked here, ranges are left to the validator.
pub fn month_day(input: &str) -> Option<(u32, u32)> {
    let mut pairs = SubmissionParser::parse(Rule::month_day, input).ok()?;
    let mut components = pairs.next()?.into_inner();
    let month = number(components.next()?)?;
    let day = number(components.next()?)?;
    Some((month, day))
}

fn number(token: Pair<Rule>) -> Option<u32> {
    match token.as_rule() {
        Rule::number => token.as_str().parse::<u32>().ok(),
        _ => None,
    }
}
