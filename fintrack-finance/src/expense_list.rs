//! Expense listing: stored expenses interleaved with the virtual monthly
//! repetitions of the recurring ones, plus the actions allowed on each row.

use chrono::{NaiveDate, NaiveDateTime};
use fintrack_core::{Bucket, ExpenseRecord, RecordStore, occurrences};
use serde::Serialize;
use tracing::info;

use crate::error::{FinanceError, Result};

/// One row of the expense list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseEntry {
    /// Record id, or `<record id>-virtual-<date>` for a repetition
    pub id: String,
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub bucket: Bucket,
    pub is_recurring: bool,
    pub recurrence_end_date: Option<NaiveDate>,
    /// Original record id when this row is a computed repetition
    pub virtual_of: Option<String>,
}

impl ExpenseEntry {
    fn stored(record: &ExpenseRecord) -> Self {
        Self {
            id: record.id.clone(),
            value: record.value,
            date: record.date,
            description: record.description.clone(),
            category: record.category.clone(),
            bucket: record.bucket,
            is_recurring: record.is_recurring,
            recurrence_end_date: record.recurrence_end_date,
            virtual_of: None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.virtual_of.is_some()
    }

    /// A recurring series that has been given an end date.
    pub fn is_cancelled(&self) -> bool {
        self.is_recurring && self.recurrence_end_date.is_some()
    }

    /// The stored record this row stands for.
    pub fn record_id(&self) -> &str {
        self.virtual_of.as_deref().unwrap_or(&self.id)
    }
}

/// Stored expenses plus their visible repetitions, newest first.
pub fn build_expense_list(records: &[ExpenseRecord], now: NaiveDateTime) -> Vec<ExpenseEntry> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        entries.push(ExpenseEntry::stored(record));

        let Some(seed) = record.as_seed() else {
            continue;
        };
        entries.extend(occurrences(&seed, now).map(|occurrence| ExpenseEntry {
            id: occurrence.synthetic_id(),
            date: occurrence.occurrence_date,
            virtual_of: Some(occurrence.original_record_id),
            ..ExpenseEntry::stored(record)
        }));
    }

    // stable, so same-day rows keep insertion order
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

/// Per-bucket sums of a list
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketTotals {
    pub essentials: f64,
    pub lifestyle: f64,
    pub savings: f64,
}

impl BucketTotals {
    pub fn add(&mut self, bucket: Bucket, value: f64) {
        match bucket {
            Bucket::Essentials => self.essentials += value,
            Bucket::Lifestyle => self.lifestyle += value,
            Bucket::Savings => self.savings += value,
        }
    }

    pub fn get(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Essentials => self.essentials,
            Bucket::Lifestyle => self.lifestyle,
            Bucket::Savings => self.savings,
        }
    }

    pub fn total(&self) -> f64 {
        self.essentials + self.lifestyle + self.savings
    }
}

impl<'a> FromIterator<&'a ExpenseEntry> for BucketTotals {
    fn from_iter<I: IntoIterator<Item = &'a ExpenseEntry>>(iter: I) -> Self {
        let mut totals = Self::default();
        for entry in iter {
            totals.add(entry.bucket, entry.value);
        }
        totals
    }
}

pub fn find_entry<'a>(entries: &'a [ExpenseEntry], id: &str) -> Result<&'a ExpenseEntry> {
    entries
        .iter()
        .find(|e| e.id == id)
        .ok_or_else(|| FinanceError::NotFound { id: id.to_string() })
}

fn reject_virtual(entry: &ExpenseEntry) -> Result<&str> {
    match &entry.virtual_of {
        Some(original_id) => Err(FinanceError::VirtualOccurrence {
            original_id: original_id.clone(),
        }),
        None => Ok(&entry.id),
    }
}

/// Record id to edit. Repetitions are read-only.
pub fn edit_target(entry: &ExpenseEntry) -> Result<&str> {
    reject_virtual(entry)
}

/// Record id to delete. Repetitions cannot be deleted on their own.
pub fn delete_target(entry: &ExpenseEntry) -> Result<&str> {
    reject_virtual(entry)
}

/// Record id whose recurrence should end; a repetition resolves to its
/// original. A series that already has an end date stays closed.
pub fn cancel_target(entry: &ExpenseEntry) -> Result<&str> {
    if !entry.is_recurring {
        return Err(FinanceError::NotRecurring(entry.id.clone()));
    }
    if let Some(end) = entry.recurrence_end_date {
        return Err(FinanceError::AlreadyCancelled {
            id: entry.record_id().to_string(),
            end,
        });
    }
    Ok(entry.record_id())
}

/// End a recurring series as of `today`. Repetitions dated on or before
/// `today` stay visible.
pub fn cancel_recurrence(
    store: &mut dyn RecordStore,
    owner: &str,
    entry: &ExpenseEntry,
    today: NaiveDate,
) -> Result<ExpenseRecord> {
    let target = cancel_target(entry)?;
    let record = store.set_recurrence_end(owner, target, Some(today))?;
    info!(owner, id = target, end = %today, "recurrence cancelled");
    Ok(record)
}

/// Delete a stored expense; its repetitions vanish with it.
pub fn delete_expense(store: &mut dyn RecordStore, owner: &str, entry: &ExpenseEntry) -> Result<()> {
    let target = delete_target(entry)?;
    store.delete_expense(owner, target)?;
    info!(owner, id = target, "expense deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{MemoryStore, NewExpense};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 4, 20).and_hms_opt(10, 0, 0).unwrap()
    }

    fn seeded() -> (MemoryStore, Vec<ExpenseRecord>) {
        let mut store = MemoryStore::new();
        let records = store
            .insert_expenses(
                "u1",
                vec![
                    NewExpense::new(39.9, date(2024, 1, 10), "Streaming", "Assinaturas").recurring(true),
                    NewExpense::new(120.0, date(2024, 4, 2), "Mercado", "Alimentação"),
                ],
            )
            .unwrap();
        (store, records)
    }

    #[test]
    fn test_list_interleaves_virtual_rows_newest_first() {
        let (_, records) = seeded();
        let list = build_expense_list(&records, now());

        let dates: Vec<_> = list.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 4, 10), date(2024, 4, 2), date(2024, 3, 10), date(2024, 2, 10), date(2024, 1, 10)]
        );
        assert_eq!(list.iter().filter(|e| e.is_virtual()).count(), 3);

        let april = &list[0];
        assert_eq!(april.virtual_of.as_deref(), Some(records[0].id.as_str()));
        assert_eq!(april.id, format!("{}-virtual-2024-04-10", records[0].id));
        assert_eq!(april.value, 39.9);
        assert_eq!(april.category, "Assinaturas");
    }

    #[test]
    fn test_entry_serializes_bucket_label() {
        let (_, records) = seeded();
        let list = build_expense_list(&records, now());
        let json = serde_json::to_value(&list[0]).unwrap();
        assert_eq!(json["bucket"], "Estilo de Vida");
        assert_eq!(json["date"], "2024-04-10");
        assert_eq!(json["virtual_of"], records[0].id.as_str());
    }

    #[test]
    fn test_bucket_totals() {
        let (_, records) = seeded();
        let list = build_expense_list(&records, now());
        let totals: BucketTotals = list.iter().collect();
        assert!((totals.lifestyle - 4.0 * 39.9).abs() < 1e-9);
        assert_eq!(totals.essentials, 120.0);
        assert_eq!(totals.savings, 0.0);
        assert!((totals.total() - (4.0 * 39.9 + 120.0)).abs() < 1e-9);
    }

    #[test]
    fn test_virtual_rows_are_not_editable_or_deletable() {
        let (_, records) = seeded();
        let list = build_expense_list(&records, now());
        let virtual_row = list.iter().find(|e| e.is_virtual()).unwrap();

        assert!(matches!(edit_target(virtual_row), Err(FinanceError::VirtualOccurrence { .. })));
        assert!(matches!(delete_target(virtual_row), Err(FinanceError::VirtualOccurrence { .. })));
        assert_eq!(cancel_target(virtual_row).unwrap(), records[0].id);
    }

    #[test]
    fn test_cancel_requires_recurring() {
        let (_, records) = seeded();
        let list = build_expense_list(&records, now());
        let plain = find_entry(&list, &records[1].id).unwrap();
        assert!(matches!(cancel_target(plain), Err(FinanceError::NotRecurring(_))));
        assert!(find_entry(&list, "nope").is_err());
    }

    #[test]
    fn test_cancel_through_virtual_row_keeps_past_repetitions() {
        let (mut store, records) = seeded();
        let list = build_expense_list(&records, now());
        let march = list.iter().find(|e| e.date == date(2024, 3, 10)).unwrap();

        let updated = cancel_recurrence(&mut store, "u1", march, date(2024, 3, 15)).unwrap();
        assert_eq!(updated.recurrence_end_date, Some(date(2024, 3, 15)));

        let list = build_expense_list(&store.expenses("u1").unwrap(), now());
        assert_eq!(list.iter().filter(|e| e.is_virtual()).count(), 2);
        assert!(list.iter().filter(|e| e.is_recurring).all(ExpenseEntry::is_cancelled));
    }

    #[test]
    fn test_second_cancel_does_not_reopen_series() {
        let (mut store, records) = seeded();
        let list = build_expense_list(&records, now());
        let original = find_entry(&list, &records[0].id).unwrap();
        cancel_recurrence(&mut store, "u1", original, date(2024, 3, 5)).unwrap();

        let later = date(2024, 6, 20).and_hms_opt(9, 0, 0).unwrap();
        let list = build_expense_list(&store.expenses("u1").unwrap(), later);
        let virtual_dates: Vec<_> = list.iter().filter(|e| e.is_virtual()).map(|e| e.date).collect();
        assert_eq!(virtual_dates, vec![date(2024, 2, 10)]);

        for entry in list.iter().filter(|e| e.is_recurring) {
            let err = cancel_recurrence(&mut store, "u1", entry, date(2024, 6, 20)).unwrap_err();
            assert!(matches!(err, FinanceError::AlreadyCancelled { end, .. } if end == date(2024, 3, 5)));
        }

        let stored = store.expenses("u1").unwrap();
        let streaming = stored.iter().find(|r| r.id == records[0].id).unwrap();
        assert_eq!(streaming.recurrence_end_date, Some(date(2024, 3, 5)));
        let list = build_expense_list(&stored, later);
        assert_eq!(list.iter().filter(|e| e.is_virtual()).count(), 1);
    }

    #[test]
    fn test_delete_removes_original_and_repetitions() {
        let (mut store, records) = seeded();
        let list = build_expense_list(&records, now());
        let original = find_entry(&list, &records[0].id).unwrap();

        delete_expense(&mut store, "u1", original).unwrap();
        let list = build_expense_list(&store.expenses("u1").unwrap(), now());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].description, "Mercado");
    }
}
