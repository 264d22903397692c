use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Subcommand;
use fintrack_core::{ExpenseUpdate, NewExpense, RecordStore};
use fintrack_finance::{
    BucketTotals, build_expense_list, cancel_recurrence, delete_expense, edit_target, find_entry,
};

use crate::app::App;
use crate::render::{money, print_expenses};

#[derive(Subcommand, Debug)]
pub enum ExpensesCommand {
    /// List expenses, including monthly repeats of recurring ones
    List {
        /// Print JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Record an expense
    Add {
        value: f64,
        /// YYYY-MM-DD
        date: NaiveDate,
        description: String,
        category: String,

        /// Repeat every month from DATE
        #[arg(long, default_value_t = false)]
        recurring: bool,
    },

    /// Change a stored expense (monthly repeats cannot be edited)
    Edit {
        id: String,
        #[arg(long)]
        value: Option<f64>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        recurring: Option<bool>,
    },

    /// Stop a recurring expense from today; accepts a repeat's id too
    Cancel { id: String },

    /// Delete a stored expense and all of its repeats
    Delete { id: String },
}

pub fn run(cmd: ExpensesCommand) -> Result<()> {
    let mut app = App::open()?;
    match cmd {
        ExpensesCommand::List { json } => list(&app, json),
        ExpensesCommand::Add {
            value,
            date,
            description,
            category,
            recurring,
        } => add(&mut app, NewExpense::new(value, date, description, category).recurring(recurring)),
        ExpensesCommand::Edit {
            id,
            value,
            date,
            description,
            category,
            recurring,
        } => edit(&mut app, &id, value, date, description, category, recurring),
        ExpensesCommand::Cancel { id } => cancel(&mut app, &id),
        ExpensesCommand::Delete { id } => delete(&mut app, &id),
    }
}

fn list(app: &App, json: bool) -> Result<()> {
    let entries = build_expense_list(&app.store.expenses(app.owner())?, app.now()?);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No expenses yet. Add one: fintrack expenses add <value> <date> <description> <category>");
        return Ok(());
    }

    print_expenses(&entries, app.currency());
    let totals: BucketTotals = entries.iter().collect();
    println!("\nTotal {}", money(app.currency(), totals.total()));
    Ok(())
}

fn add(app: &mut App, expense: NewExpense) -> Result<()> {
    if expense.value == 0.0 {
        bail!("expense value must be non-zero");
    }
    let owner = app.user.id.clone();
    let rec = app
        .store
        .insert_expenses(&owner, vec![expense])?
        .into_iter()
        .next()
        .context("store returned no record")?;
    println!(
        "Added {} {} ({}, {}){}",
        rec.date,
        money(app.currency(), rec.value),
        rec.category,
        rec.bucket,
        if rec.is_recurring { ", repeats monthly" } else { "" }
    );
    println!("id: {}", rec.id);
    Ok(())
}

fn edit(
    app: &mut App,
    id: &str,
    value: Option<f64>,
    date: Option<NaiveDate>,
    description: Option<String>,
    category: Option<String>,
    recurring: Option<bool>,
) -> Result<()> {
    let owner = app.user.id.clone();
    let records = app.store.expenses(&owner)?;
    let entries = build_expense_list(&records, app.now()?);
    let target = edit_target(find_entry(&entries, id)?)?;

    let Some(current) = records.iter().find(|r| r.id == target) else {
        bail!("expense not found: {target}");
    };
    let update = ExpenseUpdate {
        value: value.unwrap_or(current.value),
        date: date.unwrap_or(current.date),
        description: description.unwrap_or_else(|| current.description.clone()),
        category: category.unwrap_or_else(|| current.category.clone()),
        is_recurring: recurring.unwrap_or(current.is_recurring),
    };

    let rec = app.store.update_expense(&owner, target, update)?;
    println!("Updated {} ({} {})", rec.id, rec.date, money(app.currency(), rec.value));
    Ok(())
}

fn cancel(app: &mut App, id: &str) -> Result<()> {
    let owner = app.user.id.clone();
    let now = app.now()?;
    let entries = build_expense_list(&app.store.expenses(&owner)?, now);
    let entry = find_entry(&entries, id)?;

    let rec = cancel_recurrence(&mut app.store, &owner, entry, now.date())?;
    println!("Recurrence of {} ends {}", rec.description, now.date());
    Ok(())
}

fn delete(app: &mut App, id: &str) -> Result<()> {
    let owner = app.user.id.clone();
    let entries = build_expense_list(&app.store.expenses(&owner)?, app.now()?);
    let entry = find_entry(&entries, id)?;

    delete_expense(&mut app.store, &owner, entry)?;
    println!("Deleted {id}");
    Ok(())
}
