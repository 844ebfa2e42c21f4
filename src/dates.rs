// Lenient GEDCOM date handling.
//
// Genealogical sources are imprecise: dates may be day-month-year, month-year,
// year only, carry approximation qualifiers, or be free text. Parsing returns
// None for anything it cannot pin to a calendar date; callers report a
// warning and keep going.

use chrono::{Datelike, NaiveDate};

/// GEDCOM month abbreviations, in order
pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Qualifiers that prefix a date without changing the date itself
const QUALIFIERS: [&str; 7] = ["ABT", "EST", "CAL", "BEF", "AFT", "FROM", "INT"];

fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|&m| m == token)
        .map(|i| i as u32 + 1)
}

/// Year token, tolerating the dual-year form "1990/91"
fn parse_year(token: &str) -> Option<i32> {
    let token = token.split('/').next().unwrap_or(token);
    let year: i32 = token.parse().ok()?;
    if year > 0 {
        Some(year)
    } else {
        None
    }
}

/// Parse a GEDCOM date value to a calendar date.
///
/// Partial dates resolve to the first day of the period: "JAN 1990" becomes
/// 1990-01-01 and "1990" becomes 1990-01-01. Ranges ("BET 1990 AND 1992")
/// resolve to their opening date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let upper = text.trim().to_uppercase();
    let mut tokens: Vec<&str> = upper.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    if tokens[0] == "BET" {
        tokens.remove(0);
        if let Some(and) = tokens.iter().position(|&t| t == "AND") {
            tokens.truncate(and);
        }
    } else if QUALIFIERS.contains(&tokens[0]) {
        tokens.remove(0);
        if let Some(to) = tokens.iter().position(|&t| t == "TO") {
            tokens.truncate(to);
        }
    }

    match tokens.as_slice() {
        [day, month, year] => {
            let day: u32 = day.parse().ok()?;
            NaiveDate::from_ymd_opt(parse_year(year)?, month_number(month)?, day)
        }
        [month, year] => NaiveDate::from_ymd_opt(parse_year(year)?, month_number(month)?, 1),
        [year] => NaiveDate::from_ymd_opt(parse_year(year)?, 1, 1),
        _ => None,
    }
}

/// Format a calendar date in GEDCOM form, "2 JAN 1990"
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}
