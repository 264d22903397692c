use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fintrack_core::{AuthService, DateWindow, RecurringExpenseSeed, project_occurrences, project_within};
use fintrack_finance::{Ledger, PeriodFilter, compute_dashboard};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod auth;
mod config;
mod expenses_cmd;
mod import_cmd;
mod records_cmd;
mod render;
mod state;
mod store;

use app::App;
use auth::LocalSession;
use expenses_cmd::ExpensesCommand;
use import_cmd::ImportOptions;
use records_cmd::{IncomesCommand, InvestmentsCommand};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINTRACK_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "fintrack", version = VERSION, about = "Personal finance: statement import, recurring expenses, 50/30/20 dashboard")]
struct Cli {
    /// -v for info logs, -vv for debug (RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in; records are kept per email
    Login {
        email: String,
        #[arg(long)]
        name: Option<String>,
    },

    Logout,

    /// Show the signed-in user
    Whoami,

    /// Parse an OFX or CSV bank statement and review it; --commit saves it
    Import {
        file: PathBuf,

        #[arg(long, default_value_t = false)]
        commit: bool,

        /// Category for income rows without one
        #[arg(long)]
        income_category: Option<String>,

        /// Category for expense rows without one
        #[arg(long)]
        expense_category: Option<String>,

        /// Row number to switch between income and expense (repeatable)
        #[arg(long = "flip")]
        flip: Vec<usize>,

        /// Row number to leave out (repeatable)
        #[arg(long = "skip")]
        skip: Vec<usize>,

        /// N=CATEGORY for a single row (repeatable)
        #[arg(long = "set")]
        assign: Vec<String>,
    },

    Expenses {
        #[command(subcommand)]
        command: ExpensesCommand,
    },

    Incomes {
        #[command(subcommand)]
        command: IncomesCommand,
    },

    Investments {
        #[command(subcommand)]
        command: InvestmentsCommand,
    },

    /// Totals, balance and 50/30/20 split for a week, month or year
    Dashboard {
        #[arg(long, value_enum, default_value_t = Period::Month)]
        period: Period,

        /// 0 = current period, -1 = previous, 1 = next
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Preview the monthly repeats of an expense dated ANCHOR
    Project {
        #[arg(long)]
        anchor: NaiveDate,

        /// Day the recurrence was cancelled
        #[arg(long)]
        cancel: Option<NaiveDate>,

        /// Evaluate as of this day instead of today
        #[arg(long)]
        now: Option<NaiveDate>,

        /// Only list repeats on or after this day (needs --to)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,

        /// Only list repeats on or before this day (needs --from)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },

    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.fintrack/config.toml
    Init,
    /// Print the effective configuration
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Period {
    Week,
    Month,
    Year,
}

impl From<Period> for PeriodFilter {
    fn from(p: Period) -> Self {
        match p {
            Period::Week => PeriodFilter::Week,
            Period::Month => PeriodFilter::Month,
            Period::Year => PeriodFilter::Year,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Login { email, name } => {
            let mut session = LocalSession::open(state::session_path()?)?;
            let user = session.sign_in(&email, name)?;
            println!("Signed in as {} <{}>", user.display_name(), user.email);
        }

        Command::Logout => {
            let mut session = LocalSession::open(state::session_path()?)?;
            session.sign_out()?;
            println!("Signed out");
        }

        Command::Whoami => {
            let session = LocalSession::open(state::session_path()?)?;
            match session.current_user()? {
                Some(user) => println!("{} <{}>", user.display_name(), user.email),
                None => println!("Not signed in (run `fintrack login <email>`)"),
            }
        }

        Command::Import {
            file,
            commit,
            income_category,
            expense_category,
            flip,
            skip,
            assign,
        } => {
            import_cmd::run(
                &file,
                ImportOptions {
                    commit,
                    income_category,
                    expense_category,
                    flip,
                    skip,
                    assign,
                },
            )?;
        }

        Command::Expenses { command } => expenses_cmd::run(command)?,
        Command::Incomes { command } => records_cmd::run_incomes(command)?,
        Command::Investments { command } => records_cmd::run_investments(command)?,

        Command::Dashboard { period, offset, json } => {
            let app = App::open()?;
            let ledger = Ledger::load(&app.store, app.owner())?;
            let summary = compute_dashboard(&ledger, period.into(), offset, app.now()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                render::print_dashboard(&summary, app.currency());
            }
        }

        Command::Project {
            anchor,
            cancel,
            now,
            from,
            to,
        } => {
            let now = match now {
                Some(day) => day.and_time(NaiveTime::default()),
                None => config::load_config()?.local_now()?,
            };
            let mut seed = RecurringExpenseSeed::new("preview", anchor);
            seed.cancellation_date = cancel;

            let window = from.zip(to).map(|(start, end)| DateWindow::new(start, end));
            let occurrences = match window {
                Some(window) => project_within(&seed, now, window),
                None => project_occurrences(&seed, now),
            };
            if window.is_none_or(|w| w.contains(anchor)) {
                println!("{anchor}  stored entry");
            }
            for o in &occurrences {
                println!("{}  repeat", o.occurrence_date);
            }
            println!("\n{} repeats as of {}", occurrences.len(), now.date());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", state::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg)?);
                println!("# store: {}", cfg.store_path()?.display());
            }
        },
    }

    Ok(())
}
