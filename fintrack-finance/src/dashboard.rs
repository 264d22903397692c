//! Period dashboard: totals, carried-over balance, bucket split and the
//! cumulative balance history for one week, month or year.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use fintrack_core::{
    DateWindow, ExpenseRecord, IncomeRecord, InvestmentRecord, Placement, RecordStore,
    partition_by_window, time::last_day_of_month,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FinanceError, Result};
use crate::expense_list::BucketTotals;

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodFilter {
    Week,
    #[default]
    Month,
    Year,
}

/// A resolved report period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub filter: PeriodFilter,
    pub offset: i32,
    pub window: DateWindow,
    pub label: String,
}

impl ReportWindow {
    /// The period `offset` steps away from the one containing `today`
    /// (0 = current, -1 = previous). Weeks run Sunday to Saturday.
    pub fn resolve(filter: PeriodFilter, offset: i32, today: NaiveDate) -> Option<Self> {
        let (start, end, label) = match filter {
            PeriodFilter::Week => {
                let sunday = today - Duration::days(today.weekday().num_days_from_sunday().into());
                let start = sunday.checked_add_signed(Duration::days(i64::from(offset) * 7))?;
                let end = start.checked_add_signed(Duration::days(6))?;
                (start, end, format!("Week of {}", start.format("%Y-%m-%d")))
            }
            PeriodFilter::Month => {
                let first = today.with_day(1)?;
                let start = if offset >= 0 {
                    first.checked_add_months(Months::new(offset.unsigned_abs()))?
                } else {
                    first.checked_sub_months(Months::new(offset.unsigned_abs()))?
                };
                let end = last_day_of_month(start.year(), start.month())?;
                (start, end, start.format("%B %Y").to_string())
            }
            PeriodFilter::Year => {
                let year = today.year().checked_add(offset)?;
                let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
                (start, end, format!("Year {year}"))
            }
        };

        Some(Self {
            filter,
            offset,
            window: DateWindow::new(start, end),
            label,
        })
    }

    /// Names of the history bins, in order.
    pub fn bin_names(&self) -> Vec<String> {
        match self.filter {
            PeriodFilter::Week => WEEKDAY_NAMES.iter().map(|n| n.to_string()).collect(),
            PeriodFilter::Month => (1..=self.window.end.day()).map(|d| d.to_string()).collect(),
            PeriodFilter::Year => MONTH_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// History bin a date falls into.
    pub fn bin_index(&self, date: NaiveDate) -> usize {
        match self.filter {
            PeriodFilter::Week => date.weekday().num_days_from_sunday() as usize,
            PeriodFilter::Month => date.day0() as usize,
            PeriodFilter::Year => date.month0() as usize,
        }
    }
}

/// Everything one owner has stored
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub incomes: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub investments: Vec<InvestmentRecord>,
}

impl Ledger {
    pub fn load(store: &dyn RecordStore, owner: &str) -> Result<Self> {
        Ok(Self {
            incomes: store.incomes(owner)?,
            expenses: store.expenses(owner)?,
            investments: store.investments(owner)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryBin {
    pub name: String,
    /// Running balance at the end of this bin
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub period: ReportWindow,
    pub total_incomes: f64,
    pub total_expenses: f64,
    pub total_investments: f64,
    /// Incomes minus expenses strictly before the period
    pub previous_balance: f64,
    pub current_balance: f64,
    pub buckets: BucketTotals,
    pub history: Vec<HistoryBin>,
}

/// Expense sums for one report window
#[derive(Debug, Default)]
struct ExpenseTally {
    within: f64,
    before: f64,
    buckets: BucketTotals,
}

impl ExpenseTally {
    fn charge(&mut self, period: &ReportWindow, bins: &mut [f64], record: &ExpenseRecord, date: NaiveDate) {
        self.within += record.value;
        self.buckets.add(record.bucket, record.value);
        bins[period.bin_index(date)] -= record.value;
    }
}

pub fn compute_dashboard(
    ledger: &Ledger,
    filter: PeriodFilter,
    offset: i32,
    now: NaiveDateTime,
) -> Result<DashboardSummary> {
    let today = now.date();
    let period = ReportWindow::resolve(filter, offset, today)
        .ok_or(FinanceError::PeriodOutOfRange { offset })?;
    let window = period.window;

    let mut bins = vec![0.0; period.bin_names().len()];
    let mut total_incomes = 0.0;
    let mut past_incomes = 0.0;
    for income in &ledger.incomes {
        match window.place(income.date) {
            Placement::Before => past_incomes += income.value,
            Placement::Within => {
                total_incomes += income.value;
                bins[period.bin_index(income.date)] += income.value;
            }
            Placement::After => {}
        }
    }

    let mut tally = ExpenseTally::default();
    for expense in &ledger.expenses {
        match window.place(expense.date) {
            Placement::Before => tally.before += expense.value,
            Placement::Within => tally.charge(&period, &mut bins, expense, expense.date),
            Placement::After => {}
        }

        let Some(seed) = expense.as_seed() else {
            continue;
        };
        let split = partition_by_window(&seed, now, window);
        for _ in &split.before {
            tally.before += expense.value;
        }
        for occurrence in &split.within {
            tally.charge(&period, &mut bins, expense, occurrence.occurrence_date);
        }
    }
    let ExpenseTally {
        within: total_expenses,
        before: past_expenses,
        buckets,
    } = tally;

    let total_investments = ledger
        .investments
        .iter()
        .filter(|i| window.contains(i.date))
        .map(|i| i.value)
        .sum();

    let previous_balance = past_incomes - past_expenses;
    let current_balance = previous_balance + total_incomes - total_expenses;

    // The current period stops at today; future periods have no history.
    let visible = match offset {
        o if o > 0 => 0,
        0 => period.bin_index(today) + 1,
        _ => bins.len(),
    };
    let mut running = previous_balance;
    let history = period
        .bin_names()
        .into_iter()
        .zip(bins)
        .take(visible)
        .map(|(name, delta)| {
            running += delta;
            HistoryBin { name, balance: running }
        })
        .collect();

    debug!(label = %period.label, total_incomes, total_expenses, previous_balance, "dashboard computed");

    Ok(DashboardSummary {
        period,
        total_incomes,
        total_expenses,
        total_investments,
        previous_balance,
        current_balance,
        buckets,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::{NewExpense, NewIncome, NewInvestment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        // a Saturday
        date(2024, 4, 20).and_hms_opt(10, 0, 0).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger {
            incomes: vec![
                NewIncome::new(3000.0, date(2024, 3, 5), "Salary", "Salário").into_record("i1", "u"),
                NewIncome::new(3000.0, date(2024, 4, 5), "Salary", "Salário").into_record("i2", "u"),
            ],
            expenses: vec![
                NewExpense::new(40.0, date(2024, 1, 10), "Streaming", "Assinaturas")
                    .recurring(true)
                    .into_record("e1", "u"),
                NewExpense::new(500.0, date(2024, 4, 12), "Rent", "Moradia").into_record("e2", "u"),
                NewExpense::new(200.0, date(2024, 4, 15), "Reserve", "Reserva").into_record("e3", "u"),
            ],
            investments: vec![NewInvestment::new(250.0, date(2024, 4, 1), "Viagem").into_record("v1", "u")],
        }
    }

    #[test]
    fn test_resolve_week_starts_sunday() {
        let w = ReportWindow::resolve(PeriodFilter::Week, 0, date(2024, 4, 17)).unwrap();
        assert_eq!(w.window, DateWindow::new(date(2024, 4, 14), date(2024, 4, 20)));
        assert_eq!(w.label, "Week of 2024-04-14");

        let prev = ReportWindow::resolve(PeriodFilter::Week, -1, date(2024, 4, 14)).unwrap();
        assert_eq!(prev.window.start, date(2024, 4, 7));
    }

    #[test]
    fn test_resolve_month_and_year() {
        let m = ReportWindow::resolve(PeriodFilter::Month, -2, date(2024, 4, 30)).unwrap();
        assert_eq!(m.window, DateWindow::new(date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(m.label, "February 2024");
        assert_eq!(m.bin_names().len(), 29);

        let next = ReportWindow::resolve(PeriodFilter::Month, 9, date(2024, 4, 30)).unwrap();
        assert_eq!(next.window.start, date(2025, 1, 1));

        let y = ReportWindow::resolve(PeriodFilter::Year, 1, date(2024, 4, 30)).unwrap();
        assert_eq!(y.window, DateWindow::new(date(2025, 1, 1), date(2025, 12, 31)));
        assert_eq!(y.label, "Year 2025");
    }

    #[test]
    fn test_month_totals_include_repetitions() {
        let summary = compute_dashboard(&ledger(), PeriodFilter::Month, 0, now()).unwrap();

        assert_eq!(summary.total_incomes, 3000.0);
        // rent + reserve + April's streaming repetition
        assert_eq!(summary.total_expenses, 740.0);
        assert_eq!(summary.total_investments, 250.0);
        assert_eq!(summary.buckets.essentials, 500.0);
        assert_eq!(summary.buckets.lifestyle, 40.0);
        assert_eq!(summary.buckets.savings, 200.0);

        // March salary minus Jan, Feb and Mar streaming
        assert_eq!(summary.previous_balance, 3000.0 - 120.0);
        assert_eq!(summary.current_balance, 2880.0 + 3000.0 - 740.0);
    }

    #[test]
    fn test_current_month_history_stops_today() {
        let summary = compute_dashboard(&ledger(), PeriodFilter::Month, 0, now()).unwrap();
        assert_eq!(summary.history.len(), 20);
        assert_eq!(summary.history[0].name, "1");
        assert_eq!(summary.history[0].balance, 2880.0);
        assert_eq!(summary.history[4].balance, 5880.0);
        assert_eq!(summary.history[9].balance, 5840.0);
        assert_eq!(summary.history.last().unwrap().balance, summary.current_balance);
    }

    #[test]
    fn test_past_and_future_history() {
        let past = compute_dashboard(&ledger(), PeriodFilter::Month, -1, now()).unwrap();
        assert_eq!(past.history.len(), 31);
        assert_eq!(past.previous_balance, -80.0);
        assert_eq!(past.total_expenses, 40.0);
        assert_eq!(past.history.last().unwrap().balance, past.current_balance);

        let future = compute_dashboard(&ledger(), PeriodFilter::Month, 1, now()).unwrap();
        assert!(future.history.is_empty());
        assert_eq!(future.total_expenses, 0.0);
        assert_eq!(future.previous_balance, 6000.0 - 160.0 - 700.0);
    }

    #[test]
    fn test_cancelled_series_stops_counting() {
        let mut ledger = ledger();
        ledger.expenses[0].recurrence_end_date = Some(date(2024, 3, 5));
        let seed = ledger.expenses[0].as_seed().unwrap();

        let april = compute_dashboard(&ledger, PeriodFilter::Month, 0, now()).unwrap();
        assert_eq!(april.total_expenses, 700.0);
        assert_eq!(april.buckets.lifestyle, 0.0);
        // Jan record plus the Feb repetition
        let split = partition_by_window(&seed, now(), april.period.window);
        assert_eq!(split.before.len(), 1);
        assert!(split.within.is_empty());
        assert_eq!(april.previous_balance, 3000.0 - 40.0 * (1 + split.before.len()) as f64);

        let february = compute_dashboard(&ledger, PeriodFilter::Month, -2, now()).unwrap();
        assert_eq!(february.total_expenses, 40.0);
        assert_eq!(february.history[9].balance, -80.0);
    }

    #[test]
    fn test_week_and_year_bins() {
        let week = compute_dashboard(&ledger(), PeriodFilter::Week, 0, now()).unwrap();
        assert_eq!(week.history.len(), 7);
        assert_eq!(week.history[0].name, "Sun");
        assert_eq!(week.total_expenses, 200.0);

        let year = compute_dashboard(&ledger(), PeriodFilter::Year, 0, now()).unwrap();
        assert_eq!(year.history.len(), 4);
        assert_eq!(year.history[3].name, "Apr");
        assert_eq!(year.previous_balance, 0.0);
        assert_eq!(year.total_expenses, 4.0 * 40.0 + 700.0);
    }
}
