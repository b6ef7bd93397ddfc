use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use genie_core::calculations::{BracketScheduleError, validate_schedule};
use genie_core::{
    ContributionLimits, FicaRates, FilingStatus, PerFilingStatus, StateTaxRule, TaxBracket,
    TaxTables, TaxYearTable,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// The dataset shipped with the crate.
pub const BUNDLED_DATASET: &str = include_str!("../data/tax-tables.json");

/// Errors that can occur when loading the tax table dataset.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tax year {0} not found in dataset")]
    MissingTaxYear(i32),

    #[error("invalid bracket schedule '{table}': {source}")]
    InvalidBrackets {
        table: String,
        #[source]
        source: BracketScheduleError,
    },

    #[error("rate {rate} for '{field}' must be between 0 and 1")]
    InvalidRate { field: String, rate: Decimal },

    #[error("amount {value} for '{field}' must not be negative")]
    NegativeAmount { field: String, value: Decimal },
}

impl From<serde_json::Error> for DataFormatError {
    fn from(err: serde_json::Error) -> Self {
        DataFormatError::Parse(err.to_string())
    }
}

/// The whole dataset file: one entry per tax year plus the default year.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxDataset {
    /// Schema version, informational only.
    #[serde(default)]
    pub version: Option<u32>,
    pub current_year: i32,
    pub tax_years: BTreeMap<i32, TaxYearRecord>,
}

impl TaxDataset {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.tax_years.keys().copied()
    }
}

/// One year's worth of tables, as written in the dataset.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxYearRecord {
    pub federal_tax_brackets: PerFilingStatus<Vec<BracketRecord>>,
    pub standard_deductions: PerFilingStatus<Decimal>,
    pub child_tax_credit: Decimal,
    pub fica_rates: FicaRecord,
    pub contribution_limits: ContributionLimitsRecord,
    pub state_tax_data: BTreeMap<String, StateRuleRecord>,
}

/// A bracket row. A `null` (or absent) `max` marks the top bracket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub rate: Decimal,
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl BracketRecord {
    fn to_bracket(&self) -> TaxBracket {
        match self.max {
            Some(max) => TaxBracket::bounded(self.rate, self.min, max),
            None => TaxBracket::unbounded(self.rate, self.min),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FicaRecord {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
    pub social_security_wage_base: Decimal,
    pub additional_medicare_threshold: PerFilingStatus<Decimal>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributionLimitsRecord {
    pub contribution_401k: Decimal,
    pub hsa_family: Decimal,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateRuleRecord {
    Progressive { brackets: Vec<BracketRecord> },
    Flat { rate: Decimal },
    #[serde(rename = "none")]
    NoIncomeTax,
}

/// Loader for the JSON tax table dataset.
///
/// Parsing and conversion are separate steps: [`TaxTableLoader::parse`]
/// reads the raw dataset, [`TaxTableLoader::load`] picks a year, validates
/// every schedule and produces the immutable [`TaxTables`] that calculations
/// borrow.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse the raw dataset from any reader.
    pub fn parse<R: Read>(reader: R) -> Result<TaxDataset, DataFormatError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse the raw dataset from a string.
    pub fn parse_str(json: &str) -> Result<TaxDataset, DataFormatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the tables for `year`, or for the dataset's `current_year`
    /// when no year is given.
    pub fn load(
        dataset: &TaxDataset,
        year: Option<i32>,
    ) -> Result<TaxTables, DataFormatError> {
        let year = year.unwrap_or(dataset.current_year);
        let record = dataset
            .tax_years
            .get(&year)
            .ok_or(DataFormatError::MissingTaxYear(year))?;

        let tables = record.to_tables(year)?;

        info!(
            year,
            states = tables.states.len(),
            "Loaded tax tables"
        );

        Ok(tables)
    }

    /// Parse and load a dataset string in one step.
    pub fn load_str(
        json: &str,
        year: Option<i32>,
    ) -> Result<TaxTables, DataFormatError> {
        let dataset = Self::parse_str(json)?;
        Self::load(&dataset, year)
    }

    /// Parse and load a dataset file.
    pub fn load_file(
        path: &Path,
        year: Option<i32>,
    ) -> Result<TaxTables, DataFormatError> {
        let file = File::open(path).map_err(|source| DataFormatError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "Reading tax table dataset");

        let dataset = Self::parse(file)?;
        Self::load(&dataset, year)
    }

    /// Load the dataset compiled into the crate.
    pub fn bundled(year: Option<i32>) -> Result<TaxTables, DataFormatError> {
        Self::load_str(BUNDLED_DATASET, year)
    }
}

impl TaxYearRecord {
    fn to_tables(
        &self,
        year: i32,
    ) -> Result<TaxTables, DataFormatError> {
        let federal_brackets = self.federal_tax_brackets.try_map(|status, records| {
            schedule(format!("federal.{}", status.as_str()), records)
        })?;

        let standard_deductions = self.standard_deductions.try_map(|status, amount| {
            non_negative(
                format!("standard_deductions.{}", status.as_str()),
                *amount,
            )
        })?;

        let year_table = TaxYearTable {
            year,
            federal_brackets,
            standard_deductions,
            child_tax_credit_per_dependent: non_negative(
                "child_tax_credit".to_string(),
                self.child_tax_credit,
            )?,
        };

        let states = self
            .state_tax_data
            .iter()
            .map(|(code, rule)| Ok((code.clone(), rule.to_rule(code)?)))
            .collect::<Result<BTreeMap<_, _>, DataFormatError>>()?;

        Ok(TaxTables {
            year_table,
            fica: self.fica_rates.to_rates()?,
            contribution_limits: self.contribution_limits.to_limits()?,
            states,
        })
    }
}

impl FicaRecord {
    fn to_rates(&self) -> Result<FicaRates, DataFormatError> {
        let additional_medicare_threshold =
            self.additional_medicare_threshold
                .try_map(|status: FilingStatus, amount| {
                    non_negative(
                        format!("fica_rates.additional_medicare_threshold.{}", status.as_str()),
                        *amount,
                    )
                })?;

        Ok(FicaRates {
            social_security_rate: rate("fica_rates.social_security", self.social_security)?,
            medicare_rate: rate("fica_rates.medicare", self.medicare)?,
            additional_medicare_rate: rate(
                "fica_rates.additional_medicare",
                self.additional_medicare,
            )?,
            social_security_wage_base: non_negative(
                "fica_rates.social_security_wage_base".to_string(),
                self.social_security_wage_base,
            )?,
            additional_medicare_threshold,
        })
    }
}

impl ContributionLimitsRecord {
    fn to_limits(&self) -> Result<ContributionLimits, DataFormatError> {
        Ok(ContributionLimits {
            max_401k: non_negative(
                "contribution_limits.contribution_401k".to_string(),
                self.contribution_401k,
            )?,
            hsa_family_max: non_negative(
                "contribution_limits.hsa_family".to_string(),
                self.hsa_family,
            )?,
        })
    }
}

impl StateRuleRecord {
    fn to_rule(
        &self,
        code: &str,
    ) -> Result<StateTaxRule, DataFormatError> {
        match self {
            Self::Progressive { brackets } => Ok(StateTaxRule::Progressive {
                brackets: schedule(format!("state.{code}"), brackets)?,
            }),
            Self::Flat { rate: flat } => Ok(StateTaxRule::Flat {
                rate: rate(&format!("state.{code}.rate"), *flat)?,
            }),
            Self::NoIncomeTax => Ok(StateTaxRule::NoIncomeTax),
        }
    }
}

fn schedule(
    table: String,
    records: &[BracketRecord],
) -> Result<Vec<TaxBracket>, DataFormatError> {
    let brackets: Vec<TaxBracket> = records.iter().map(BracketRecord::to_bracket).collect();

    validate_schedule(&brackets)
        .map_err(|source| DataFormatError::InvalidBrackets { table, source })?;

    Ok(brackets)
}

fn rate(
    field: &str,
    value: Decimal,
) -> Result<Decimal, DataFormatError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(DataFormatError::InvalidRate {
            field: field.to_string(),
            rate: value,
        });
    }
    Ok(value)
}

fn non_negative(
    field: String,
    value: Decimal,
) -> Result<Decimal, DataFormatError> {
    if value < Decimal::ZERO {
        return Err(DataFormatError::NegativeAmount { field, value });
    }
    Ok(value)
}
