use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::utc_noon;

/// Money flow direction; the only place a transaction's sign lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Income => Direction::Expense,
            Direction::Expense => Direction::Income,
        }
    }
}

/// Normalized output of statement parsers (dialect-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Absolute amount, never negative.
    pub value: f64,
    pub direction: Direction,
}

impl Transaction {
    /// The posting instant, anchored at 12:00 UTC so rendering in any
    /// timezone stays on the same calendar day.
    pub fn posted_at(&self) -> DateTime<Utc> {
        utc_noon(self.date)
    }
}
