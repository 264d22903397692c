//! Value and date normalization shared by the OFX and CSV dialects.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

use crate::types::{Direction, Transaction};

static LEADING_NUMBER: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?"));

pub(crate) fn leading_number_pattern() -> Result<&'static Regex, regex::Error> {
    (*LEADING_NUMBER).as_ref().map_err(Clone::clone)
}

/// `2024-01-15` -> `2024-01-15T12:00:00Z`
pub fn utc_noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
        .and_utc()
}

/// Remove one pair of surrounding double quotes, then surrounding whitespace.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(s)
        .trim()
}

/// Parse a bank-export amount: quotes stripped, a comma decimal separator
/// turned into a dot, then the longest leading numeric prefix is read.
///
/// Trailing garbage ("45.90 BRL") is ignored; no leading number means `None`.
pub fn parse_lenient_amount(raw: &str) -> Option<f64> {
    let cleaned = strip_quotes(raw).replacen(',', ".", 1);
    let pattern = leading_number_pattern().ok()?;
    let token = pattern.find(cleaned.trim_start())?.as_str();
    let value: f64 = token.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Split a signed amount into (absolute value, direction).
/// Zero counts as income.
pub fn split_signed(amount: f64) -> (f64, Direction) {
    let direction = if amount >= 0.0 {
        Direction::Income
    } else {
        Direction::Expense
    };
    (amount.abs(), direction)
}

pub(crate) fn transaction(date: NaiveDate, description: &str, amount: f64) -> Transaction {
    let (value, direction) = split_signed(amount);
    Transaction {
        date,
        description: description.to_string(),
        value,
        direction,
    }
}
