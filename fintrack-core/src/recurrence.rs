//! Monthly recurrence projection: expands one stored recurring expense into
//! the virtual occurrences that should be visible as of `now`.
//!
//! The stored record is the real first occurrence; every later month is
//! computed on read and never written back.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{add_months_clamped, date_with_day_clamped, month_key};

/// A persisted expense flagged as recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpenseSeed {
    pub record_id: String,
    /// Date of the stored record; the series starts here.
    pub anchor_date: NaiveDate,
    /// Last day on which an occurrence may still fall.
    pub cancellation_date: Option<NaiveDate>,
}

impl RecurringExpenseSeed {
    pub fn new(record_id: impl Into<String>, anchor_date: NaiveDate) -> Self {
        Self {
            record_id: record_id.into(),
            anchor_date,
            cancellation_date: None,
        }
    }

    pub fn cancelled_on(mut self, date: NaiveDate) -> Self {
        self.cancellation_date = Some(date);
        self
    }
}

/// A computed monthly repetition of a seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualOccurrence {
    pub occurrence_date: NaiveDate,
    pub original_record_id: String,
}

const SYNTHETIC_ID_SEPARATOR: &str = "-virtual-";

impl VirtualOccurrence {
    /// Stable list key: `<record id>-virtual-<YYYY-MM-DD>`.
    pub fn synthetic_id(&self) -> String {
        format!(
            "{}{}{}",
            self.original_record_id,
            SYNTHETIC_ID_SEPARATOR,
            self.occurrence_date.format("%Y-%m-%d")
        )
    }

    /// Inverse of [`VirtualOccurrence::synthetic_id`].
    pub fn parse_synthetic_id(id: &str) -> Option<(&str, NaiveDate)> {
        let (record_id, date) = id.rsplit_once(SYNTHETIC_ID_SEPARATOR)?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        (!record_id.is_empty()).then_some((record_id, date))
    }
}

/// Iterator over a seed's visible occurrences, oldest first.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    seed: &'a RecurringExpenseSeed,
    today: NaiveDate,
    ceiling: (i32, u32),
    step: u32,
    done: bool,
}

impl<'a> Occurrences<'a> {
    fn new(seed: &'a RecurringExpenseSeed, now: NaiveDateTime) -> Self {
        let today = now.date();
        // This month, on the anchor's day; the cancellation date takes over
        // when it comes first.
        let default_bound = date_with_day_clamped(today.year(), today.month(), seed.anchor_date.day())
            .unwrap_or(today);
        let bound = match seed.cancellation_date {
            Some(cancel) if cancel < default_bound => cancel,
            _ => default_bound,
        };

        Self {
            seed,
            today,
            ceiling: month_key(bound),
            step: 1,
            done: false,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = VirtualOccurrence;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Always offset from the anchor so clamping never drifts the day
        // (Jan 31 → Feb 29 → Mar 31, not Mar 29).
        let cursor = add_months_clamped(self.seed.anchor_date, self.step)
            .filter(|c| month_key(*c) <= self.ceiling)
            .filter(|c| self.seed.cancellation_date.is_none_or(|cancel| *c <= cancel))
            .filter(|c| *c <= self.today);

        match cursor {
            Some(date) => {
                self.step += 1;
                Some(VirtualOccurrence {
                    occurrence_date: date,
                    original_record_id: self.seed.record_id.clone(),
                })
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// Lazily project a seed as of the local wall-clock `now`.
pub fn occurrences(seed: &RecurringExpenseSeed, now: NaiveDateTime) -> Occurrences<'_> {
    Occurrences::new(seed, now)
}

/// Every visible virtual occurrence of `seed`, oldest first.
pub fn project_occurrences(seed: &RecurringExpenseSeed, now: NaiveDateTime) -> Vec<VirtualOccurrence> {
    occurrences(seed, now).collect()
}

/// Inclusive calendar-date range of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Where a date falls relative to a [`DateWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    Within,
    After,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn place(&self, date: NaiveDate) -> Placement {
        if date < self.start {
            Placement::Before
        } else if date <= self.end {
            Placement::Within
        } else {
            Placement::After
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.place(date) == Placement::Within
    }
}

/// Occurrences that fall inside `window`.
pub fn project_within(
    seed: &RecurringExpenseSeed,
    now: NaiveDateTime,
    window: DateWindow,
) -> Vec<VirtualOccurrence> {
    occurrences(seed, now)
        .filter(|o| window.contains(o.occurrence_date))
        .collect()
}

/// A seed's occurrences split around a report window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowSplit {
    /// Strictly before the window start (the carried-over balance).
    pub before: Vec<VirtualOccurrence>,
    /// Inside the window.
    pub within: Vec<VirtualOccurrence>,
}

/// Classify each occurrence into exactly one side of the window start.
/// Occurrences past the window end belong to neither side.
pub fn partition_by_window(
    seed: &RecurringExpenseSeed,
    now: NaiveDateTime,
    window: DateWindow,
) -> WindowSplit {
    let mut split = WindowSplit::default();
    for occurrence in occurrences(seed, now) {
        match window.place(occurrence.occurrence_date) {
            Placement::Before => split.before.push(occurrence),
            Placement::Within => split.within.push(occurrence),
            Placement::After => break,
        }
    }
    split
}
