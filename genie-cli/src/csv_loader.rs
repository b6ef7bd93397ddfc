//! CSV loaders for batch scenarios and W-2 forms.
//!
//! ## Scenario CSV
//!
//! One household per row. Column order does **not** matter (headers are
//! matched by name). Optional amount columns may be omitted entirely or left
//! empty; either way they count as 0. Amounts may use `,` as a thousands
//! separator when the cell is quoted.
//!
//! | Column | Required | Type | Notes |
//! |--------------------------|----------|---------|-------------------------------------------|
//! | `name` | no | string | Label used in reports |
//! | `filing_status` | yes | string | `single`, `head_of_household`, `married_jointly`, `married_separately` or `S`, `HOH`, `MFJ`, `MFS` |
//! | `state` | yes | string | Two-letter code, e.g. `CA` |
//! | `primary_wages` | yes | decimal | |
//! | `secondary_wages` | no | decimal | Spouse wages for married statuses |
//! | `contribution_401k` | no | decimal | |
//! | `contribution_hsa` | no | decimal | |
//! | `capital_loss` | no | decimal | Net loss as a positive amount |
//! | `dependents` | no | integer | |
//! | `deduction` | no | string | `standard` (default) or `itemized` |
//! | `mortgage_interest` | no | decimal | Itemized only |
//! | `property_taxes` | no | decimal | Itemized only |
//! | `charitable_donations` | no | decimal | Itemized only |
//! | `medical_expenses` | no | decimal | Itemized only |
//! | `federal_withheld` | no | decimal | |
//! | `state_withheld` | no | decimal | |
//! | `social_security_withheld` | no | decimal | |
//! | `medicare_withheld` | no | decimal | |
//!
//! ### Minimal example
//!
//! ```csv
//! filing_status,state,primary_wages
//! single,CA,100000
//! ```
//!
//! ## W-2 CSV
//!
//! One form per row: the first row is the primary earner, an optional second
//! row is the spouse. Columns are named after the boxes they hold.
//!
//! | Column | Box | Required |
//! |----------------------------|-----|----------|
//! | `wages` | 1 | yes |
//! | `federal_withheld` | 2 | no |
//! | `social_security_wages` | 3 | no |
//! | `social_security_withheld` | 4 | no |
//! | `medicare_wages` | 5 | no |
//! | `medicare_withheld` | 6 | no |
//! | `box12_code` | 12 | no |
//! | `box12_amount` | 12 | no |
//! | `state_withheld` | 17 | no |
//!
//! ```csv
//! wages,federal_withheld,box12_code,box12_amount,state_withheld
//! 90000,9000,D,10000,4000
//! 90000,9000,W,4000,4000
//! ```
use std::path::Path;

use genie_core::models::{
    Box12Code, Box12Entry, FilingStatus, ItemizedDeductions, TaxInput, W2Form, Withholding,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::{ParseDecimalError, parse_count, parse_decimal};

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    #[serde(default)]
    name: String,
    filing_status: String,
    state: String,
    primary_wages: String,
    #[serde(default)]
    secondary_wages: String,
    #[serde(default)]
    contribution_401k: String,
    #[serde(default)]
    contribution_hsa: String,
    #[serde(default)]
    capital_loss: String,
    #[serde(default)]
    dependents: String,
    #[serde(default)]
    deduction: String,
    #[serde(default)]
    mortgage_interest: String,
    #[serde(default)]
    property_taxes: String,
    #[serde(default)]
    charitable_donations: String,
    #[serde(default)]
    medical_expenses: String,
    #[serde(default)]
    federal_withheld: String,
    #[serde(default)]
    state_withheld: String,
    #[serde(default)]
    social_security_withheld: String,
    #[serde(default)]
    medicare_withheld: String,
}

#[derive(Debug, Deserialize)]
struct W2Row {
    wages: String,
    #[serde(default)]
    federal_withheld: String,
    #[serde(default)]
    social_security_wages: String,
    #[serde(default)]
    social_security_withheld: String,
    #[serde(default)]
    medicare_wages: String,
    #[serde(default)]
    medicare_withheld: String,
    #[serde(default)]
    box12_code: String,
    #[serde(default)]
    box12_amount: String,
    #[serde(default)]
    state_withheld: String,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A named calculation request read from a scenario file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub input: TaxInput,
}

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The file could not be read.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `filing_status` cell contained a value that is not one of the
    /// recognised codes. `row` is 1-based (header = row 0).
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },

    /// The `state` cell was empty.
    #[error("missing state code on row {row}")]
    MissingState { row: usize },

    /// An amount cell could not be parsed as a number.
    #[error("invalid amount in column '{column}' on row {row}: {source}")]
    InvalidAmount {
        column: &'static str,
        row: usize,
        #[source]
        source: ParseDecimalError,
    },

    /// The `dependents` cell was not a non-negative whole number.
    #[error("invalid dependent count '{value}' on row {row}")]
    InvalidDependents { value: String, row: usize },

    /// The `deduction` cell was neither `standard` nor `itemized`.
    #[error("unrecognised deduction '{value}' on row {row} (expected 'standard' or 'itemized')")]
    InvalidDeduction { value: String, row: usize },
}

// ---------------------------------------------------------------------------
// Row conversion
// ---------------------------------------------------------------------------

fn amount(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<Decimal, CsvLoadError> {
    parse_decimal(value).map_err(|source| CsvLoadError::InvalidAmount {
        column,
        row,
        source,
    })
}

/// Convert a single scenario row into a [`Scenario`].
///
/// row_number is 1-based (for error messages).
fn convert_scenario_row(
    row: ScenarioRow,
    row_number: usize,
) -> Result<Scenario, CsvLoadError> {
    let filing_status = FilingStatus::parse(&row.filing_status).ok_or_else(|| {
        CsvLoadError::InvalidFilingStatus {
            status: row.filing_status.clone(),
            row: row_number,
        }
    })?;

    let state = row.state.trim().to_ascii_uppercase();
    if state.is_empty() {
        return Err(CsvLoadError::MissingState { row: row_number });
    }

    let dependents =
        parse_count(&row.dependents).ok_or_else(|| CsvLoadError::InvalidDependents {
            value: row.dependents.clone(),
            row: row_number,
        })?;

    let itemize = match row.deduction.trim().to_ascii_lowercase().as_str() {
        "" | "standard" => false,
        "itemized" => true,
        _ => {
            return Err(CsvLoadError::InvalidDeduction {
                value: row.deduction,
                row: row_number,
            });
        }
    };

    let primary_wages = amount(&row.primary_wages, "primary_wages", row_number)?;
    let mut input = TaxInput::new(primary_wages, filing_status, state)
        .with_secondary_wages(amount(&row.secondary_wages, "secondary_wages", row_number)?)
        .with_contributions(
            amount(&row.contribution_401k, "contribution_401k", row_number)?,
            amount(&row.contribution_hsa, "contribution_hsa", row_number)?,
        )
        .with_capital_loss(amount(&row.capital_loss, "capital_loss", row_number)?)
        .with_dependents(dependents)
        .with_withholding(Withholding {
            federal: amount(&row.federal_withheld, "federal_withheld", row_number)?,
            state: amount(&row.state_withheld, "state_withheld", row_number)?,
            social_security: amount(
                &row.social_security_withheld,
                "social_security_withheld",
                row_number,
            )?,
            medicare: amount(&row.medicare_withheld, "medicare_withheld", row_number)?,
        });

    if itemize {
        input = input.with_itemized(ItemizedDeductions {
            mortgage_interest: amount(&row.mortgage_interest, "mortgage_interest", row_number)?,
            property_taxes: amount(&row.property_taxes, "property_taxes", row_number)?,
            charitable_donations: amount(
                &row.charitable_donations,
                "charitable_donations",
                row_number,
            )?,
            medical_expenses: amount(&row.medical_expenses, "medical_expenses", row_number)?,
        });
    }

    let name = if row.name.is_empty() {
        format!("row {row_number}")
    } else {
        row.name
    };

    Ok(Scenario { name, input })
}

/// Convert a single W-2 row into a [`W2Form`].
fn convert_w2_row(
    row: W2Row,
    row_number: usize,
) -> Result<W2Form, CsvLoadError> {
    let box12 = if row.box12_code.is_empty() {
        None
    } else {
        Some(Box12Entry {
            code: Box12Code::parse(&row.box12_code),
            amount: amount(&row.box12_amount, "box12_amount", row_number)?,
        })
    };

    Ok(W2Form {
        wages: amount(&row.wages, "wages", row_number)?,
        federal_withheld: amount(&row.federal_withheld, "federal_withheld", row_number)?,
        social_security_wages: amount(
            &row.social_security_wages,
            "social_security_wages",
            row_number,
        )?,
        social_security_withheld: amount(
            &row.social_security_withheld,
            "social_security_withheld",
            row_number,
        )?,
        medicare_wages: amount(&row.medicare_wages, "medicare_wages", row_number)?,
        medicare_withheld: amount(&row.medicare_withheld, "medicare_withheld", row_number)?,
        box12,
        state_withheld: amount(&row.state_withheld, "state_withheld", row_number)?,
    })
}

// ---------------------------------------------------------------------------
// Core loaders
// ---------------------------------------------------------------------------

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes())
}

fn read_file(path: &Path) -> Result<String, CsvLoadError> {
    std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse scenario CSV text and return one [`Scenario`] per row, in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   required column is missing.
/// * [CsvLoadError::InvalidFilingStatus], [CsvLoadError::InvalidAmount],
///   [CsvLoadError::InvalidDependents], [CsvLoadError::InvalidDeduction] –
///   if a cell cannot be converted.
pub fn load_scenarios_from_str(input: &str) -> Result<Vec<Scenario>, CsvLoadError> {
    reader(input)
        .deserialize::<ScenarioRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_scenario_row(row, row_number)
        })
        .collect()
}

/// Read a scenario file from disk and delegate to [load_scenarios_from_str].
pub fn load_scenarios_from_file(path: &Path) -> Result<Vec<Scenario>, CsvLoadError> {
    load_scenarios_from_str(&read_file(path)?)
}

/// Parse W-2 CSV text and return one [`W2Form`] per row, in file order.
pub fn load_w2_from_str(input: &str) -> Result<Vec<W2Form>, CsvLoadError> {
    reader(input)
        .deserialize::<W2Row>()
        .enumerate()
        .map(|(idx, result)| convert_w2_row(result?, idx + 1))
        .collect()
}

/// Read a W-2 file from disk and delegate to [load_w2_from_str].
pub fn load_w2_from_file(path: &Path) -> Result<Vec<W2Form>, CsvLoadError> {
    load_w2_from_str(&read_file(path)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
