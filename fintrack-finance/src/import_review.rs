//! Import review: parsed statement rows are selected, categorized and
//! (optionally) re-directed by the user, then split into one income batch
//! and one expense batch for the record store.

use fintrack_core::{NewExpense, NewIncome, RecordStore};
use fintrack_ingest::{Direction, Transaction};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FinanceError, Result};

/// One parsed row under review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub transaction: Transaction,
    pub selected: bool,
    pub category: Option<String>,
}

/// Disjoint insert batches produced by a review
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportBatches {
    pub incomes: Vec<NewIncome>,
    pub expenses: Vec<NewExpense>,
}

impl ImportBatches {
    pub fn len(&self) -> usize {
        self.incomes.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counts of what a commit inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub incomes: usize,
    pub expenses: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReview {
    items: Vec<ReviewItem>,
}

impl ImportReview {
    /// Every row starts selected and uncategorized.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            items: transactions
                .into_iter()
                .map(|transaction| ReviewItem {
                    transaction,
                    selected: true,
                    category: None,
                })
                .collect(),
        }
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut ReviewItem> {
        self.items.get_mut(index).ok_or_else(|| FinanceError::NotFound {
            id: format!("#{index}"),
        })
    }

    pub fn set_category(&mut self, index: usize, category: impl Into<String>) -> Result<()> {
        let category = category.into();
        self.item_mut(index)?.category = (!category.trim().is_empty()).then_some(category);
        Ok(())
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.item_mut(index)?.selected = selected;
        Ok(())
    }

    /// Flip income <-> expense. Income and expense categories differ, so the
    /// chosen category is cleared.
    pub fn toggle_direction(&mut self, index: usize) -> Result<()> {
        let item = self.item_mut(index)?;
        item.transaction.direction = item.transaction.direction.flipped();
        item.category = None;
        Ok(())
    }

    /// Fill in categories still missing, per direction.
    pub fn apply_default_categories(&mut self, income: Option<&str>, expense: Option<&str>) {
        for item in self.items.iter_mut().filter(|i| i.category.is_none()) {
            let default = match item.transaction.direction {
                Direction::Income => income,
                Direction::Expense => expense,
            };
            item.category = default.map(str::to_string);
        }
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }

    /// Split the selected rows into income and expense batches.
    pub fn to_batches(&self) -> Result<ImportBatches> {
        if self.selected_count() == 0 {
            return Err(FinanceError::NothingSelected);
        }

        let mut batches = ImportBatches::default();
        for (index, item) in self.items.iter().enumerate().filter(|(_, i)| i.selected) {
            let Some(category) = item.category.as_deref() else {
                return Err(FinanceError::MissingCategory { index });
            };
            let txn = &item.transaction;
            match txn.direction {
                Direction::Income => batches.incomes.push(NewIncome::new(
                    txn.value,
                    txn.date,
                    &txn.description,
                    category,
                )),
                Direction::Expense => batches.expenses.push(NewExpense::new(
                    txn.value,
                    txn.date,
                    &txn.description,
                    category,
                )),
            }
        }

        Ok(batches)
    }

    /// Insert both batches for `owner`.
    pub fn commit(&self, store: &mut dyn RecordStore, owner: &str) -> Result<CommitSummary> {
        let ImportBatches { incomes, expenses } = self.to_batches()?;
        let summary = CommitSummary {
            incomes: incomes.len(),
            expenses: expenses.len(),
        };

        if !expenses.is_empty() {
            store.insert_expenses(owner, expenses)?;
        }
        if !incomes.is_empty() {
            store.insert_incomes(owner, incomes)?;
        }

        info!(owner, incomes = summary.incomes, expenses = summary.expenses, "import committed");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_core::{Bucket, MemoryStore};

    fn txn(desc: &str, value: f64, direction: Direction) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            description: desc.to_string(),
            value,
            direction,
        }
    }

    fn review() -> ImportReview {
        ImportReview::new(vec![
            txn("Mercado", 45.9, Direction::Expense),
            txn("Salario", 3000.0, Direction::Income),
            txn("Cinema", 30.0, Direction::Expense),
        ])
    }

    #[test]
    fn test_new_review_selects_everything() {
        let r = review();
        assert_eq!(r.selected_count(), 3);
        assert!(r.items().iter().all(|i| i.category.is_none()));
    }

    #[test]
    fn test_missing_category_blocks_batches() {
        let mut r = review();
        r.set_category(0, "Alimentação").unwrap();
        r.set_category(1, "Salário").unwrap();
        assert!(matches!(r.to_batches(), Err(FinanceError::MissingCategory { index: 2 })));

        // deselected rows do not need a category
        r.set_selected(2, false).unwrap();
        let batches = r.to_batches().unwrap();
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_batches_are_disjoint_by_direction() {
        let mut r = review();
        r.apply_default_categories(Some("Salário"), Some("Lazer"));
        r.set_category(0, "Alimentação").unwrap();

        let batches = r.to_batches().unwrap();
        assert_eq!(batches.incomes.len(), 1);
        assert_eq!(batches.expenses.len(), 2);
        assert_eq!(batches.expenses[0].bucket, Bucket::Essentials);
        assert_eq!(batches.expenses[1].bucket, Bucket::Lifestyle);
        assert_eq!(batches.incomes[0].category, "Salário");
    }

    #[test]
    fn test_toggle_direction_clears_category() {
        let mut r = review();
        r.set_category(2, "Lazer").unwrap();
        r.toggle_direction(2).unwrap();
        assert_eq!(r.items()[2].transaction.direction, Direction::Income);
        assert_eq!(r.items()[2].category, None);
        assert!(r.toggle_direction(9).is_err());
    }

    #[test]
    fn test_nothing_selected() {
        let mut r = ImportReview::new(vec![txn("x", 1.0, Direction::Expense)]);
        r.set_selected(0, false).unwrap();
        assert!(matches!(r.to_batches(), Err(FinanceError::NothingSelected)));
    }

    #[test]
    fn test_commit_inserts_both_batches() {
        let mut r = review();
        r.apply_default_categories(Some("Salário"), Some("Compras"));
        let mut store = MemoryStore::new();

        let summary = r.commit(&mut store, "u1").unwrap();
        assert_eq!(summary, CommitSummary { incomes: 1, expenses: 2 });
        assert_eq!(store.expenses("u1").unwrap().len(), 2);
        assert_eq!(store.incomes("u1").unwrap()[0].value, 3000.0);
    }
}
