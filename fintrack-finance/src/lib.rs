//! fintrack-finance: import review, the expense list with monthly
//! repetitions, and the period dashboard.

pub mod dashboard;
pub mod error;
pub mod expense_list;
pub mod import_review;

pub use dashboard::{DashboardSummary, HistoryBin, Ledger, PeriodFilter, ReportWindow, compute_dashboard};
pub use error::{FinanceError, Result};
pub use expense_list::{
    BucketTotals, ExpenseEntry, build_expense_list, cancel_recurrence, cancel_target, delete_expense,
    delete_target, edit_target, find_entry,
};
pub use import_review::{CommitSummary, ImportBatches, ImportReview, ReviewItem};
