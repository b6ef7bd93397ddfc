use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, PerFilingStatus, TaxBracket};

/// Federal figures for a single tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearTable {
    pub year: i32,
    pub federal_brackets: PerFilingStatus<Vec<TaxBracket>>,
    pub standard_deductions: PerFilingStatus<Decimal>,
    pub child_tax_credit_per_dependent: Decimal,
}

impl TaxYearTable {
    pub fn brackets(
        &self,
        status: FilingStatus,
    ) -> &[TaxBracket] {
        self.federal_brackets.get(status)
    }

    pub fn standard_deduction(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        *self.standard_deductions.get(status)
    }
}
