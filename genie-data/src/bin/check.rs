use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use genie_core::{FilingStatus, StateTaxRule, TaxTables};
use genie_data::TaxTableLoader;
use tracing_subscriber::EnvFilter;

/// Validate a tax table dataset and print a summary of one year.
///
/// Every federal and progressive-state schedule is checked for gaps,
/// overlaps and misplaced unbounded brackets. Exits non-zero on the first
/// problem found.
#[derive(Parser, Debug)]
#[command(name = "tax-table-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the JSON dataset (defaults to the bundled dataset)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Tax year to check (defaults to the dataset's current year)
    #[arg(short, long)]
    year: Option<i32>,

    /// List every state rule instead of a count per kind
    #[arg(short, long, default_value_t = false)]
    states: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let tables = match &args.file {
        Some(path) => TaxTableLoader::load_file(path, args.year)
            .with_context(|| format!("Failed to load dataset: {}", path.display()))?,
        None => TaxTableLoader::bundled(args.year).context("Failed to load bundled dataset")?,
    };

    print_summary(&tables, args.states);

    Ok(())
}

fn print_summary(
    tables: &TaxTables,
    list_states: bool,
) {
    println!("Tax year {}", tables.year());
    println!();

    for status in FilingStatus::ALL {
        println!(
            "  {:<26} {} brackets, standard deduction {}",
            status.label(),
            tables.year_table.brackets(status).len(),
            tables.year_table.standard_deduction(status)
        );
    }

    println!();
    println!(
        "  Child tax credit:         {} per dependent",
        tables.year_table.child_tax_credit_per_dependent
    );
    println!(
        "  FICA:                     SS {} up to {}, Medicare {} (+{})",
        tables.fica.social_security_rate,
        tables.fica.social_security_wage_base,
        tables.fica.medicare_rate,
        tables.fica.additional_medicare_rate
    );
    println!(
        "  Contribution limits:      401(k) {}, HSA family {}",
        tables.contribution_limits.max_401k, tables.contribution_limits.hsa_family_max
    );
    println!();

    if list_states {
        for (code, rule) in &tables.states {
            match rule {
                StateTaxRule::Progressive { brackets } => {
                    println!("  {code}  progressive, {} brackets", brackets.len())
                }
                StateTaxRule::Flat { rate } => println!("  {code}  flat {rate}"),
                StateTaxRule::NoIncomeTax => println!("  {code}  none"),
            }
        }
    } else {
        let count = |kind: &str| tables.states.values().filter(|r| r.kind() == kind).count();
        println!(
            "  States: {} ({} progressive, {} flat, {} none)",
            tables.states.len(),
            count("progressive"),
            count("flat"),
            count("none")
        );
    }
}
