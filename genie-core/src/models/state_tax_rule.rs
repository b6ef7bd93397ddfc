use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// How a state taxes income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateTaxRule {
    /// Graduated brackets, same shape as the federal schedule.
    Progressive { brackets: Vec<TaxBracket> },

    /// A single rate on all taxable income.
    Flat { rate: Decimal },

    /// No state income tax.
    #[serde(rename = "none")]
    NoIncomeTax,
}

impl StateTaxRule {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Progressive { .. } => "progressive",
            Self::Flat { .. } => "flat",
            Self::NoIncomeTax => "none",
        }
    }
}
