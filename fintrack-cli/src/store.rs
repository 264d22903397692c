use anyhow::{Context, Result};
use chrono::NaiveDate;
use fintrack_core::{
    Bucket, ExpenseRecord, ExpenseUpdate, IncomeRecord, InvestmentRecord, MemoryStore, NewExpense,
    NewIncome, NewInvestment, RecordStore,
    legacy::{decode_description, encode_description},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Expense row as persisted: the category rides in the description and the
/// bucket is stored by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ExpenseRow {
    id: String,
    user_id: String,
    value: f64,
    date: NaiveDate,
    /// "<category> - <description>"
    description: String,
    category_type: String,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default)]
    recurrence_end_date: Option<NaiveDate>,
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(r: &ExpenseRecord) -> Self {
        Self {
            id: r.id.clone(),
            user_id: r.owner.clone(),
            value: r.value,
            date: r.date,
            description: encode_description(&r.category, &r.description),
            category_type: r.bucket.label().to_string(),
            is_recurring: r.is_recurring,
            recurrence_end_date: r.recurrence_end_date,
        }
    }
}

impl From<ExpenseRow> for ExpenseRecord {
    fn from(row: ExpenseRow) -> Self {
        let (category, description) = decode_description(&row.description);
        let bucket = Bucket::from_label(&row.category_type).unwrap_or_else(|| {
            warn!(id = %row.id, label = %row.category_type, "unknown bucket label; deriving from category");
            Bucket::for_category(&category)
        });
        Self {
            id: row.id,
            owner: row.user_id,
            value: row.value,
            date: row.date,
            description,
            category,
            bucket,
            is_recurring: row.is_recurring,
            recurrence_end_date: row.recurrence_end_date,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    expenses: Vec<ExpenseRow>,
    #[serde(default)]
    incomes: Vec<IncomeRecord>,
    #[serde(default)]
    investments: Vec<InvestmentRecord>,
}

/// File-backed record store. Reads everything up front and rewrites the
/// file after every change.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: MemoryStore,
}

impl JsonStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let file: StoreFile = if path.exists() {
            let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?
        } else {
            StoreFile::default()
        };

        let records = MemoryStore {
            expenses: file.expenses.into_iter().map(ExpenseRecord::from).collect(),
            incomes: file.incomes,
            investments: file.investments,
        };
        debug!(
            path = %path.display(),
            expenses = records.expenses.len(),
            incomes = records.incomes.len(),
            "opened record store"
        );
        Ok(Self { path, records })
    }

    fn save(&self) -> Result<()> {
        let file = StoreFile {
            expenses: self.records.expenses.iter().map(ExpenseRow::from).collect(),
            incomes: self.records.incomes.clone(),
            investments: self.records.investments.clone(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl RecordStore for JsonStore {
    fn expenses(&self, owner: &str) -> Result<Vec<ExpenseRecord>> {
        self.records.expenses(owner)
    }

    fn incomes(&self, owner: &str) -> Result<Vec<IncomeRecord>> {
        self.records.incomes(owner)
    }

    fn investments(&self, owner: &str) -> Result<Vec<InvestmentRecord>> {
        self.records.investments(owner)
    }

    fn insert_expenses(&mut self, owner: &str, batch: Vec<NewExpense>) -> Result<Vec<ExpenseRecord>> {
        let inserted = self.records.insert_expenses(owner, batch)?;
        self.save()?;
        Ok(inserted)
    }

    fn insert_incomes(&mut self, owner: &str, batch: Vec<NewIncome>) -> Result<Vec<IncomeRecord>> {
        let inserted = self.records.insert_incomes(owner, batch)?;
        self.save()?;
        Ok(inserted)
    }

    fn insert_investments(
        &mut self,
        owner: &str,
        batch: Vec<NewInvestment>,
    ) -> Result<Vec<InvestmentRecord>> {
        let inserted = self.records.insert_investments(owner, batch)?;
        self.save()?;
        Ok(inserted)
    }

    fn update_expense(&mut self, owner: &str, id: &str, update: ExpenseUpdate) -> Result<ExpenseRecord> {
        let updated = self.records.update_expense(owner, id, update)?;
        self.save()?;
        Ok(updated)
    }

    fn set_recurrence_end(
        &mut self,
        owner: &str,
        id: &str,
        end: Option<NaiveDate>,
    ) -> Result<ExpenseRecord> {
        let updated = self.records.set_recurrence_end(owner, id, end)?;
        self.save()?;
        Ok(updated)
    }

    fn delete_expense(&mut self, owner: &str, id: &str) -> Result<()> {
        self.records.delete_expense(owner, id)?;
        self.save()
    }

    fn delete_income(&mut self, owner: &str, id: &str) -> Result<()> {
        self.records.delete_income(owner, id)?;
        self.save()
    }
}
