//! Stored finance records (incomes, expenses, investment contributions).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::budget::Bucket;
use crate::recurrence::RecurringExpenseSeed;

/// An expense as held by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    /// Owning user id
    pub owner: String,
    /// Absolute amount spent
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    /// User-facing category ("Alimentação", "Assinaturas", ...)
    pub category: String,
    pub bucket: Bucket,
    /// Repeats monthly from `date`
    pub is_recurring: bool,
    /// Set when a recurring expense is cancelled
    pub recurrence_end_date: Option<NaiveDate>,
}

impl ExpenseRecord {
    /// The projection seed for a recurring expense.
    pub fn as_seed(&self) -> Option<RecurringExpenseSeed> {
        self.is_recurring.then(|| RecurringExpenseSeed {
            record_id: self.id.clone(),
            anchor_date: self.date,
            cancellation_date: self.recurrence_end_date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub id: String,
    pub owner: String,
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
}

/// A contribution towards an investment goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: String,
    pub owner: String,
    pub value: f64,
    pub date: NaiveDate,
    pub goal_name: String,
}

const GOAL_PREFIX: &str = "Meta: ";

impl InvestmentRecord {
    /// Stored goal label, e.g. "Meta: Viagem".
    pub fn goal_label(goal: &str) -> String {
        let goal = goal.trim();
        if goal.starts_with(GOAL_PREFIX) {
            goal.to_string()
        } else {
            format!("{GOAL_PREFIX}{goal}")
        }
    }

    /// Goal name without the stored prefix.
    pub fn goal(&self) -> &str {
        self.goal_name
            .strip_prefix(GOAL_PREFIX)
            .unwrap_or(&self.goal_name)
    }
}

/// Insert payload for an expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub bucket: Bucket,
    pub is_recurring: bool,
}

impl NewExpense {
    /// Build an expense whose bucket follows from its category.
    pub fn new(value: f64, date: NaiveDate, description: impl Into<String>, category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            value: value.abs(),
            date,
            description: description.into(),
            bucket: Bucket::for_category(&category),
            category,
            is_recurring: false,
        }
    }

    pub fn recurring(mut self, is_recurring: bool) -> Self {
        self.is_recurring = is_recurring;
        self
    }

    pub fn into_record(self, id: impl Into<String>, owner: impl Into<String>) -> ExpenseRecord {
        ExpenseRecord {
            id: id.into(),
            owner: owner.into(),
            value: self.value,
            date: self.date,
            description: self.description,
            category: self.category,
            bucket: self.bucket,
            is_recurring: self.is_recurring,
            recurrence_end_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIncome {
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
}

impl NewIncome {
    pub fn new(value: f64, date: NaiveDate, description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            value: value.abs(),
            date,
            description: description.into(),
            category: category.into(),
        }
    }

    pub fn into_record(self, id: impl Into<String>, owner: impl Into<String>) -> IncomeRecord {
        IncomeRecord {
            id: id.into(),
            owner: owner.into(),
            value: self.value,
            date: self.date,
            description: self.description,
            category: self.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvestment {
    pub value: f64,
    pub date: NaiveDate,
    pub goal_name: String,
}

impl NewInvestment {
    pub fn new(value: f64, date: NaiveDate, goal: &str) -> Self {
        Self {
            value: value.abs(),
            date,
            goal_name: InvestmentRecord::goal_label(goal),
        }
    }

    pub fn into_record(self, id: impl Into<String>, owner: impl Into<String>) -> InvestmentRecord {
        InvestmentRecord {
            id: id.into(),
            owner: owner.into(),
            value: self.value,
            date: self.date,
            goal_name: self.goal_name,
        }
    }
}

/// Full replacement of an expense's editable fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub value: f64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub is_recurring: bool,
}

impl ExpenseUpdate {
    /// Apply to a stored record. Turning recurrence on again clears an
    /// earlier cancellation.
    pub fn apply_to(self, record: &mut ExpenseRecord) {
        record.value = self.value.abs();
        record.date = self.date;
        record.description = self.description;
        record.bucket = Bucket::for_category(&self.category);
        record.category = self.category;
        record.is_recurring = self.is_recurring;
        if self.is_recurring {
            record.recurrence_end_date = None;
        }
    }
}
