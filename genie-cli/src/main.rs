use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use genie_core::models::{FilingStatus, TaxTables};
use tracing::{error, info};

use genie_cli::app::{self, Estimate, EstimateForm};
use genie_cli::report::{EstimateReport, to_json};
use genie_cli::{csv_loader, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Federal, state and payroll tax estimator with pre-tax savings tips.
///
/// Loads the tax tables for the requested year, computes the estimate for
/// one household (or a batch), and prints an explanation or JSON.
#[derive(Debug, Parser)]
#[command(name = "tax-genie", version, about)]
struct Cli {
    /// Tax table dataset (JSON). Defaults to the bundled dataset.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Tax year to use. Defaults to the dataset's current year.
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Print JSON instead of a text report.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Log filter, e.g. `debug` or `genie_core=debug,info`.
    /// Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate one household from command-line amounts.
    Estimate(EstimateArgs),

    /// Estimate every household in a scenario CSV.
    Batch {
        /// Scenario CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Estimate a household from its W-2 forms (CSV, one form per row).
    W2 {
        /// W-2 CSV file; first row is the primary earner, second the spouse
        #[arg(short, long)]
        file: PathBuf,

        /// Filing status (single, head_of_household, married_jointly,
        /// married_separately, or S/HOH/MFJ/MFS)
        #[arg(long)]
        status: String,

        /// Two-letter state code
        #[arg(long)]
        state: String,
    },
}

/// Amounts accept thousands separators; anything left out is 0.
#[derive(Debug, Args)]
struct EstimateArgs {
    /// Filing status (single, head_of_household, married_jointly,
    /// married_separately, or S/HOH/MFJ/MFS)
    #[arg(long)]
    status: String,

    /// Two-letter state code
    #[arg(long)]
    state: String,

    /// Primary earner wages
    #[arg(long)]
    wages: String,

    /// Spouse wages
    #[arg(long, default_value = "")]
    spouse_wages: String,

    /// 401(k) contributions for the household
    #[arg(long = "401k", default_value = "")]
    contribution_401k: String,

    /// HSA contributions
    #[arg(long, default_value = "")]
    hsa: String,

    /// Net capital loss, as a positive amount
    #[arg(long, default_value = "")]
    capital_loss: String,

    /// Number of qualifying children
    #[arg(long, default_value = "")]
    dependents: String,

    /// Itemize instead of taking the standard deduction (the larger wins)
    #[arg(long, default_value_t = false)]
    itemize: bool,

    #[arg(long, default_value = "")]
    mortgage_interest: String,

    #[arg(long, default_value = "")]
    property_taxes: String,

    #[arg(long, default_value = "")]
    charitable: String,

    #[arg(long, default_value = "")]
    medical: String,

    #[arg(long, default_value = "")]
    federal_withheld: String,

    #[arg(long, default_value = "")]
    state_withheld: String,

    #[arg(long, default_value = "")]
    social_security_withheld: String,

    #[arg(long, default_value = "")]
    medicare_withheld: String,
}

impl From<EstimateArgs> for EstimateForm {
    fn from(args: EstimateArgs) -> Self {
        EstimateForm {
            filing_status: args.status,
            state: args.state,
            primary_wages: args.wages,
            secondary_wages: args.spouse_wages,
            contribution_401k: args.contribution_401k,
            contribution_hsa: args.hsa,
            capital_loss: args.capital_loss,
            dependents: args.dependents,
            itemize: args.itemize,
            mortgage_interest: args.mortgage_interest,
            property_taxes: args.property_taxes,
            charitable_donations: args.charitable,
            medical_expenses: args.medical,
            federal_withheld: args.federal_withheld,
            state_withheld: args.state_withheld,
            social_security_withheld: args.social_security_withheld,
            medicare_withheld: args.medicare_withheld,
            errors: Vec::new(),
        }
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn estimate(
    tables: &TaxTables,
    args: EstimateArgs,
) -> anyhow::Result<Vec<Estimate>> {
    let mut form = EstimateForm::from(args);
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => bail!("invalid input:\n  {}", errors.join("\n  ")),
    };

    Ok(vec![app::run_estimate(tables, input)?])
}

fn batch(
    tables: &TaxTables,
    file: &Path,
) -> anyhow::Result<Vec<Estimate>> {
    let scenarios = csv_loader::load_scenarios_from_file(file)
        .with_context(|| format!("Failed to load scenarios: {}", file.display()))?;
    info!(count = scenarios.len(), "Loaded scenarios");

    let total = scenarios.len();
    let mut estimates = Vec::with_capacity(total);
    let mut failed = 0;
    for scenario in scenarios {
        match app::run_estimate(tables, scenario.input) {
            Ok(mut estimate) => {
                estimate.name = Some(scenario.name);
                estimates.push(estimate);
            }
            Err(e) => {
                error!(scenario = %scenario.name, "{e}");
                failed += 1;
            }
        }
    }

    if failed > 0 && estimates.is_empty() {
        bail!("all {total} scenarios failed validation");
    }
    if failed > 0 {
        error!("{failed} of {total} scenarios failed validation and were skipped");
    }
    Ok(estimates)
}

fn w2(
    tables: &TaxTables,
    file: &Path,
    status: &str,
    state: &str,
) -> anyhow::Result<Vec<Estimate>> {
    let filing_status: FilingStatus = status.parse()?;
    let forms = csv_loader::load_w2_from_file(file)
        .with_context(|| format!("Failed to load W-2 forms: {}", file.display()))?;

    Ok(vec![app::run_w2_estimate(tables, &forms, filing_status, state)?])
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let tables = app::load_tables(cli.data.as_deref(), cli.year).with_context(|| match &cli.data {
        Some(path) => format!("Failed to load tax tables: {}", path.display()),
        None => "Failed to load bundled tax tables".to_string(),
    })?;

    let estimates = match cli.command {
        Command::Estimate(args) => estimate(&tables, args)?,
        Command::Batch { file } => batch(&tables, &file)?,
        Command::W2 {
            file,
            status,
            state,
        } => w2(&tables, &file, &status, &state)?,
    };

    if cli.json {
        println!("{}", to_json(&estimates)?);
    } else {
        for estimate in &estimates {
            println!("{}", EstimateReport::new(estimate, &tables));
        }
    }

    Ok(())
}
