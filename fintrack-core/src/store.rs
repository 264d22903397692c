//! Record store seam. Persistence lives behind [`RecordStore`]; every call
//! is scoped to one owner.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::records::{
    ExpenseRecord, ExpenseUpdate, IncomeRecord, InvestmentRecord, NewExpense, NewIncome,
    NewInvestment,
};

pub trait RecordStore {
    fn expenses(&self, owner: &str) -> Result<Vec<ExpenseRecord>>;
    fn incomes(&self, owner: &str) -> Result<Vec<IncomeRecord>>;
    fn investments(&self, owner: &str) -> Result<Vec<InvestmentRecord>>;

    fn insert_expenses(&mut self, owner: &str, batch: Vec<NewExpense>) -> Result<Vec<ExpenseRecord>>;
    fn insert_incomes(&mut self, owner: &str, batch: Vec<NewIncome>) -> Result<Vec<IncomeRecord>>;
    fn insert_investments(
        &mut self,
        owner: &str,
        batch: Vec<NewInvestment>,
    ) -> Result<Vec<InvestmentRecord>>;

    fn update_expense(&mut self, owner: &str, id: &str, update: ExpenseUpdate) -> Result<ExpenseRecord>;
    /// Set (or clear) the end of a recurring expense.
    fn set_recurrence_end(
        &mut self,
        owner: &str,
        id: &str,
        end: Option<chrono::NaiveDate>,
    ) -> Result<ExpenseRecord>;
    fn delete_expense(&mut self, owner: &str, id: &str) -> Result<()>;
    fn delete_income(&mut self, owner: &str, id: &str) -> Result<()>;
}

/// In-process store; also the working set of file-backed stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    pub expenses: Vec<ExpenseRecord>,
    pub incomes: Vec<IncomeRecord>,
    pub investments: Vec<InvestmentRecord>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn expense_mut(&mut self, owner: &str, id: &str) -> Result<&mut ExpenseRecord> {
        match self
            .expenses
            .iter_mut()
            .find(|e| e.owner == owner && e.id == id)
        {
            Some(e) => Ok(e),
            None => bail!("expense not found: {id}"),
        }
    }
}

impl RecordStore for MemoryStore {
    fn expenses(&self, owner: &str) -> Result<Vec<ExpenseRecord>> {
        Ok(self.expenses.iter().filter(|e| e.owner == owner).cloned().collect())
    }

    fn incomes(&self, owner: &str) -> Result<Vec<IncomeRecord>> {
        Ok(self.incomes.iter().filter(|i| i.owner == owner).cloned().collect())
    }

    fn investments(&self, owner: &str) -> Result<Vec<InvestmentRecord>> {
        Ok(self.investments.iter().filter(|i| i.owner == owner).cloned().collect())
    }

    fn insert_expenses(&mut self, owner: &str, batch: Vec<NewExpense>) -> Result<Vec<ExpenseRecord>> {
        let inserted: Vec<_> = batch.into_iter().map(|e| e.into_record(new_id(), owner)).collect();
        self.expenses.extend(inserted.iter().cloned());
        debug!(owner, count = inserted.len(), "inserted expenses");
        Ok(inserted)
    }

    fn insert_incomes(&mut self, owner: &str, batch: Vec<NewIncome>) -> Result<Vec<IncomeRecord>> {
        let inserted: Vec<_> = batch.into_iter().map(|i| i.into_record(new_id(), owner)).collect();
        self.incomes.extend(inserted.iter().cloned());
        debug!(owner, count = inserted.len(), "inserted incomes");
        Ok(inserted)
    }

    fn insert_investments(
        &mut self,
        owner: &str,
        batch: Vec<NewInvestment>,
    ) -> Result<Vec<InvestmentRecord>> {
        let inserted: Vec<_> = batch.into_iter().map(|i| i.into_record(new_id(), owner)).collect();
        self.investments.extend(inserted.iter().cloned());
        debug!(owner, count = inserted.len(), "inserted investments");
        Ok(inserted)
    }

    fn update_expense(&mut self, owner: &str, id: &str, update: ExpenseUpdate) -> Result<ExpenseRecord> {
        let record = self.expense_mut(owner, id)?;
        update.apply_to(record);
        Ok(record.clone())
    }

    fn set_recurrence_end(
        &mut self,
        owner: &str,
        id: &str,
        end: Option<chrono::NaiveDate>,
    ) -> Result<ExpenseRecord> {
        let record = self.expense_mut(owner, id)?;
        record.recurrence_end_date = end;
        debug!(owner, id, ?end, "recurrence end set");
        Ok(record.clone())
    }

    fn delete_expense(&mut self, owner: &str, id: &str) -> Result<()> {
        let before = self.expenses.len();
        self.expenses.retain(|e| !(e.owner == owner && e.id == id));
        if self.expenses.len() == before {
            bail!("expense not found: {id}");
        }
        Ok(())
    }

    fn delete_income(&mut self, owner: &str, id: &str) -> Result<()> {
        let before = self.incomes.len();
        self.incomes.retain(|i| !(i.owner == owner && i.id == id));
        if self.incomes.len() == before {
            bail!("income not found: {id}");
        }
        Ok(())
    }
}
