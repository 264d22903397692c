//! fintrack-core: records, budget buckets, the monthly recurrence projector
//! and the collaborator seams (record store, auth).

pub mod auth;
pub mod budget;
pub mod legacy;
pub mod records;
pub mod recurrence;
pub mod store;
pub mod time;

pub use auth::{AuthService, User, require_user};
pub use budget::{Bucket, INCOME_CATEGORIES};
pub use records::{
    ExpenseRecord, ExpenseUpdate, IncomeRecord, InvestmentRecord, NewExpense, NewIncome,
    NewInvestment,
};
pub use recurrence::{
    DateWindow, Occurrences, Placement, RecurringExpenseSeed, VirtualOccurrence, WindowSplit,
    occurrences, partition_by_window, project_occurrences, project_within,
};
pub use store::{MemoryStore, RecordStore};
