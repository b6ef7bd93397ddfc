use std::path::Path;

use genie_core::calculations::{
    PotentialSavings, SavingsEstimator, TaxCalculationPipeline, W2ImportError,
};
use genie_core::models::{
    FilingStatus, ItemizedDeductions, TaxInput, TaxResult, TaxTables, W2Form, Withholding,
};
use genie_core::validation::{InputOutOfRange, validate_input};
use genie_data::{DataFormatError, TaxTableLoader};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::utils::{parse_count, parse_decimal};

/// Raw, unparsed household entry as typed by the user.
///
/// Every amount is kept as text until [`EstimateForm::validate`] so that a
/// single pass can report every bad field at once.
#[derive(Debug, Clone, Default)]
pub struct EstimateForm {
    pub filing_status: String,
    pub state: String,
    pub primary_wages: String,
    pub secondary_wages: String,
    pub contribution_401k: String,
    pub contribution_hsa: String,
    pub capital_loss: String,
    pub dependents: String,
    pub itemize: bool,
    pub mortgage_interest: String,
    pub property_taxes: String,
    pub charitable_donations: String,
    pub medical_expenses: String,
    pub federal_withheld: String,
    pub state_withheld: String,
    pub social_security_withheld: String,
    pub medicare_withheld: String,

    // Validation errors
    pub errors: Vec<String>,
}

impl EstimateForm {
    /// Parse the form into a [`TaxInput`].
    ///
    /// Empty amounts are 0. On failure every problem is left in
    /// [`EstimateForm::errors`].
    pub fn validate(&mut self) -> Result<TaxInput, Vec<String>> {
        self.errors.clear();

        let filing_status = FilingStatus::parse(&self.filing_status);
        if filing_status.is_none() {
            self.errors
                .push(format!("Filing status '{}' is not recognised", self.filing_status));
        }

        let state = self.state.trim().to_ascii_uppercase();
        if state.is_empty() {
            self.errors.push("State is required".to_string());
        }

        let errors = &mut self.errors;
        let primary_wages = amount(errors, "Primary wages", &self.primary_wages);
        let secondary_wages = amount(errors, "Secondary wages", &self.secondary_wages);
        let contribution_401k = amount(errors, "401(k) contribution", &self.contribution_401k);
        let contribution_hsa = amount(errors, "HSA contribution", &self.contribution_hsa);
        let capital_loss = amount(errors, "Capital loss", &self.capital_loss);

        let itemized = ItemizedDeductions {
            mortgage_interest: amount(errors, "Mortgage interest", &self.mortgage_interest),
            property_taxes: amount(errors, "Property taxes", &self.property_taxes),
            charitable_donations: amount(
                errors,
                "Charitable donations",
                &self.charitable_donations,
            ),
            medical_expenses: amount(errors, "Medical expenses", &self.medical_expenses),
        };

        let withholding = Withholding {
            federal: amount(errors, "Federal withholding", &self.federal_withheld),
            state: amount(errors, "State withholding", &self.state_withheld),
            social_security: amount(
                errors,
                "Social security withholding",
                &self.social_security_withheld,
            ),
            medicare: amount(errors, "Medicare withholding", &self.medicare_withheld),
        };

        let dependents = parse_count(&self.dependents);
        if dependents.is_none() {
            self.errors
                .push(format!("Dependents '{}' must be a whole number", self.dependents.trim()));
        }

        let (Some(filing_status), Some(dependents)) = (filing_status, dependents) else {
            return Err(self.errors.clone());
        };
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        let mut input = TaxInput::new(primary_wages, filing_status, state)
            .with_secondary_wages(secondary_wages)
            .with_contributions(contribution_401k, contribution_hsa)
            .with_capital_loss(capital_loss)
            .with_dependents(dependents)
            .with_withholding(withholding);
        if self.itemize {
            input = input.with_itemized(itemized);
        }

        Ok(input)
    }
}

fn amount(
    errors: &mut Vec<String>,
    field: &str,
    value: &str,
) -> Decimal {
    match parse_decimal(value) {
        Ok(v) => v,
        Err(_) => {
            errors.push(format!("{field} must be a valid number (got '{}')", value.trim()));
            Decimal::ZERO
        }
    }
}

/// Everything produced for one household.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub name: Option<String>,
    pub input: TaxInput,
    pub result: TaxResult,
    pub potential_savings: PotentialSavings,
}

/// Reasons an estimate could not be produced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateError {
    #[error(transparent)]
    OutOfRange(#[from] InputOutOfRange),

    #[error(transparent)]
    W2Import(#[from] W2ImportError),

    #[error("a W-2 file holds at most two forms (primary and spouse), found {0}")]
    TooManyW2Forms(usize),

    #[error("no tax rule for state '{0}' in the loaded tables")]
    UnknownState(String),
}

/// Load the tables for `year` from `data`, or from the bundled dataset.
pub fn load_tables(
    data: Option<&Path>,
    year: Option<i32>,
) -> Result<TaxTables, DataFormatError> {
    match data {
        Some(path) => TaxTableLoader::load_file(path, year),
        None => TaxTableLoader::bundled(year),
    }
}

/// Validate `input`, run the pipeline and estimate the remaining savings.
///
/// # Errors
///
/// Returns [`EstimateError::OutOfRange`] if the input fails range checks and
/// [`EstimateError::UnknownState`] if the tables have no rule for its state.
pub fn run_estimate(
    tables: &TaxTables,
    input: TaxInput,
) -> Result<Estimate, EstimateError> {
    validate_input(&input, &tables.contribution_limits)?;
    if tables.state_rule(&input.state).is_none() {
        return Err(EstimateError::UnknownState(input.state));
    }

    let result = TaxCalculationPipeline::new(tables).compute(&input);
    let potential_savings = SavingsEstimator::new(tables).estimate(&result, &input);

    debug!(
        total_tax_owed = %result.total_tax_owed,
        refund_or_owed = %result.refund_or_owed,
        potential_savings = %potential_savings.total,
        "estimate complete"
    );

    Ok(Estimate {
        name: None,
        input,
        result,
        potential_savings,
    })
}

/// Build the input from W-2 forms (primary first, optional spouse second)
/// and run [`run_estimate`].
pub fn run_w2_estimate(
    tables: &TaxTables,
    forms: &[W2Form],
    filing_status: FilingStatus,
    state: &str,
) -> Result<Estimate, EstimateError> {
    let (primary, secondary) = match forms {
        [] => return Err(W2ImportError::MissingPrimaryWages.into()),
        [primary] => (primary, None),
        [primary, secondary] => (primary, Some(secondary)),
        _ => return Err(EstimateError::TooManyW2Forms(forms.len())),
    };

    info!(forms = forms.len(), %filing_status, state, "Importing W-2 forms");

    let input = TaxInput::from_w2_forms(primary, secondary, filing_status, state)?;
    run_estimate(tables, input)
}
