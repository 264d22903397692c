use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use fintrack_core::{INCOME_CATEGORIES, NewIncome, NewInvestment, RecordStore, budget::is_income_category};
use tracing::warn;

use crate::app::App;
use crate::render::{money, print_incomes, print_investments};

#[derive(Subcommand, Debug)]
pub enum IncomesCommand {
    /// List incomes, newest first
    List,

    /// Record an income
    Add {
        value: f64,
        /// YYYY-MM-DD
        date: NaiveDate,
        description: String,
        category: String,
    },

    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum InvestmentsCommand {
    /// List contributions, newest first
    List,

    /// Record a contribution towards a goal
    Add {
        value: f64,
        /// YYYY-MM-DD
        date: NaiveDate,
        goal: String,
    },
}

pub fn run_incomes(cmd: IncomesCommand) -> Result<()> {
    let mut app = App::open()?;
    let owner = app.user.id.clone();
    match cmd {
        IncomesCommand::List => {
            let mut incomes = app.store.incomes(&owner)?;
            incomes.sort_by(|a, b| b.date.cmp(&a.date));
            print_incomes(&incomes, app.currency());
            let total: f64 = incomes.iter().map(|i| i.value).sum();
            println!("\nTotal {}", money(app.currency(), total));
        }
        IncomesCommand::Add {
            value,
            date,
            description,
            category,
        } => {
            if !is_income_category(&category) {
                warn!(%category, known = ?INCOME_CATEGORIES, "unusual income category");
            }
            let rec = app
                .store
                .insert_incomes(&owner, vec![NewIncome::new(value, date, description, category)])?
                .into_iter()
                .next()
                .context("store returned no record")?;
            println!("Added {} {} ({})", rec.date, money(app.currency(), rec.value), rec.category);
            println!("id: {}", rec.id);
        }
        IncomesCommand::Delete { id } => {
            app.store.delete_income(&owner, &id)?;
            println!("Deleted {id}");
        }
    }
    Ok(())
}

pub fn run_investments(cmd: InvestmentsCommand) -> Result<()> {
    let mut app = App::open()?;
    let owner = app.user.id.clone();
    match cmd {
        InvestmentsCommand::List => {
            let mut investments = app.store.investments(&owner)?;
            investments.sort_by(|a, b| b.date.cmp(&a.date));
            print_investments(&investments, app.currency());
        }
        InvestmentsCommand::Add { value, date, goal } => {
            let rec = app
                .store
                .insert_investments(&owner, vec![NewInvestment::new(value, date, &goal)])?
                .into_iter()
                .next()
                .context("store returned no record")?;
            println!("Added {} {} towards {}", rec.date, money(app.currency(), rec.value), rec.goal());
        }
    }
    Ok(())
}
