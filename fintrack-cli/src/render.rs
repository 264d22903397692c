use fintrack_core::{Bucket, IncomeRecord, InvestmentRecord};
use fintrack_finance::{DashboardSummary, ExpenseEntry, ImportReview};
use fintrack_ingest::Direction;

/// Brazilian-style amount: `R$ 1.234,56`, `-R$ 10,00`.
pub fn money(symbol: &str, value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol} {grouped},{:02}", cents % 100)
}

pub fn print_review(review: &ImportReview, symbol: &str) {
    for (i, item) in review.items().iter().enumerate() {
        let t = &item.transaction;
        let mark = if item.selected { "x" } else { " " };
        let kind = match t.direction {
            Direction::Income => "+",
            Direction::Expense => "-",
        };
        println!(
            "[{mark}] #{i:<3} {} {kind}{:>14}  {:<40} {}",
            t.date,
            money(symbol, t.value),
            t.description,
            item.category.as_deref().unwrap_or("(no category)")
        );
    }
}

pub fn print_expenses(entries: &[ExpenseEntry], symbol: &str) {
    for e in entries {
        let tag = match (&e.virtual_of, e.is_recurring, e.is_cancelled()) {
            (Some(_), _, _) => "monthly repeat",
            (None, true, true) => "recurring, cancelled",
            (None, true, false) => "recurring",
            _ => "",
        };
        println!(
            "{}  {:>14}  {:<24} {:<30} {:<14} {}  {}",
            e.date,
            money(symbol, e.value),
            e.category,
            e.description,
            e.bucket.label(),
            tag,
            e.id
        );
    }
}

pub fn print_incomes(incomes: &[IncomeRecord], symbol: &str) {
    for i in incomes {
        println!(
            "{}  {:>14}  {:<24} {:<30} {}",
            i.date,
            money(symbol, i.value),
            i.category,
            i.description,
            i.id
        );
    }
}

pub fn print_investments(investments: &[InvestmentRecord], symbol: &str) {
    for i in investments {
        println!("{}  {:>14}  {:<30} {}", i.date, money(symbol, i.value), i.goal(), i.id);
    }
}

pub fn print_dashboard(summary: &DashboardSummary, symbol: &str) {
    println!("# {}\n", summary.period.label);
    println!("Current balance   {:>16}", money(symbol, summary.current_balance));
    println!("Previous balance  {:>16}", money(symbol, summary.previous_balance));
    println!("Incomes           {:>16}", money(symbol, summary.total_incomes));
    println!("Expenses          {:>16}", money(symbol, summary.total_expenses));
    println!("Investments       {:>16}", money(symbol, summary.total_investments));

    println!("\n## 50/30/20\n");
    let spent = summary.buckets.total();
    for bucket in Bucket::ALL {
        let value = summary.buckets.get(bucket);
        let share = if spent > 0.0 { value / spent * 100.0 } else { 0.0 };
        println!(
            "{:<16} {:>16}  {:>5.1}% (target {:.0}%)",
            bucket.label(),
            money(symbol, value),
            share,
            bucket.target_share() * 100.0
        );
    }

    if !summary.history.is_empty() {
        println!("\n## Balance\n");
        for bin in &summary.history {
            println!("{:<5} {:>16}", bin.name, money(symbol, bin.balance));
        }
    }
}
