use anyhow::{Context, Result, bail};
use fintrack_finance::ImportReview;
use fintrack_ingest::parse_statement;
use std::fs;
use std::path::Path;

use crate::app::App;
use crate::render::print_review;

/// Review choices given on the command line.
#[derive(Debug, Default, Clone)]
pub struct ImportOptions {
    pub commit: bool,
    pub income_category: Option<String>,
    pub expense_category: Option<String>,
    /// Rows to switch between income and expense
    pub flip: Vec<usize>,
    /// Rows to leave out
    pub skip: Vec<usize>,
    /// `N=Category` assignments
    pub assign: Vec<String>,
}

fn parse_assignment(raw: &str) -> Result<(usize, &str)> {
    let Some((index, category)) = raw.split_once('=') else {
        bail!("expected N=CATEGORY, got {raw:?}");
    };
    let index = index
        .trim()
        .parse()
        .with_context(|| format!("bad row number in {raw:?}"))?;
    Ok((index, category.trim()))
}

/// Apply the command-line choices to a fresh review. Flips come first
/// because they clear a row's category.
pub fn apply_options(
    review: &mut ImportReview,
    opts: &ImportOptions,
    config_defaults: (Option<&str>, Option<&str>),
) -> Result<()> {
    for &i in &opts.flip {
        review.toggle_direction(i)?;
    }
    for &i in &opts.skip {
        review.set_selected(i, false)?;
    }
    for raw in &opts.assign {
        let (i, category) = parse_assignment(raw)?;
        review.set_category(i, category)?;
    }

    let income = opts.income_category.as_deref().or(config_defaults.0);
    let expense = opts.expense_category.as_deref().or(config_defaults.1);
    review.apply_default_categories(income, expense);
    Ok(())
}

fn read_statement(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    // Bank exports are not always UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn run(file: &Path, opts: ImportOptions) -> Result<()> {
    let mut app = App::open()?;

    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file: {}", file.display()))?;
    let txns = parse_statement(name, &read_statement(file)?)?;
    if txns.is_empty() {
        println!("No transactions found in {}", file.display());
        return Ok(());
    }

    let mut review = ImportReview::new(txns);
    let defaults = &app.config.import;
    apply_options(
        &mut review,
        &opts,
        (defaults.default_income_category.as_deref(), defaults.default_expense_category.as_deref()),
    )?;

    print_review(&review, app.currency());
    println!("\n{} of {} selected", review.selected_count(), review.items().len());

    if !opts.commit {
        // surface missing categories before the user commits
        review.to_batches()?;
        println!("Looks good. Re-run with --commit to save.");
        return Ok(());
    }

    let owner = app.user.id.clone();
    let summary = review.commit(&mut app.store, &owner)?;
    println!("Saved {} incomes and {} expenses", summary.incomes, summary.expenses);
    Ok(())
}
