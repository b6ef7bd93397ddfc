use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FilingStatus;

/// Which deduction the caller asked for.
///
/// Requesting itemized only makes the itemized total a candidate; the
/// standard deduction still wins unless the itemized total is larger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    #[default]
    Standard,
    Itemized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedDeductions {
    pub mortgage_interest: Decimal,
    pub property_taxes: Decimal,
    pub charitable_donations: Decimal,

    /// Gross medical expenses; only the part above 7.5% of AGI is deductible.
    pub medical_expenses: Decimal,
}

/// Amounts already withheld during the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withholding {
    pub federal: Decimal,
    pub state: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
}

impl Withholding {
    pub fn total(&self) -> Decimal {
        self.federal + self.state + self.social_security + self.medicare
    }
}

/// A single calculation request.
///
/// Wages are kept per earner (up to two) so the household 401(k) limit can be
/// derived; every calculation uses [`TaxInput::gross_income`], their sum.
/// Callers are expected to have validated ranges before calculating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub primary_wages: Decimal,
    pub secondary_wages: Decimal,
    pub filing_status: FilingStatus,

    /// Two-letter state code.
    pub state: String,

    pub contribution_401k: Decimal,
    pub contribution_hsa: Decimal,
    pub capital_loss: Decimal,
    pub dependents: u32,
    pub deduction_method: DeductionMethod,
    pub itemized: ItemizedDeductions,
    pub withholding: Withholding,
}

impl TaxInput {
    /// A single-earner request with every optional amount at zero.
    pub fn new(
        gross_income: Decimal,
        filing_status: FilingStatus,
        state: impl Into<String>,
    ) -> Self {
        Self {
            primary_wages: gross_income,
            secondary_wages: Decimal::ZERO,
            filing_status,
            state: state.into(),
            contribution_401k: Decimal::ZERO,
            contribution_hsa: Decimal::ZERO,
            capital_loss: Decimal::ZERO,
            dependents: 0,
            deduction_method: DeductionMethod::Standard,
            itemized: ItemizedDeductions::default(),
            withholding: Withholding::default(),
        }
    }

    pub fn gross_income(&self) -> Decimal {
        self.primary_wages + self.secondary_wages
    }

    pub fn with_secondary_wages(
        mut self,
        wages: Decimal,
    ) -> Self {
        self.secondary_wages = wages;
        self
    }

    pub fn with_contributions(
        mut self,
        contribution_401k: Decimal,
        contribution_hsa: Decimal,
    ) -> Self {
        self.contribution_401k = contribution_401k;
        self.contribution_hsa = contribution_hsa;
        self
    }

    pub fn with_capital_loss(
        mut self,
        capital_loss: Decimal,
    ) -> Self {
        self.capital_loss = capital_loss;
        self
    }

    pub fn with_dependents(
        mut self,
        dependents: u32,
    ) -> Self {
        self.dependents = dependents;
        self
    }

    /// Requests itemizing with the given amounts.
    pub fn with_itemized(
        mut self,
        itemized: ItemizedDeductions,
    ) -> Self {
        self.deduction_method = DeductionMethod::Itemized;
        self.itemized = itemized;
        self
    }

    pub fn with_withholding(
        mut self,
        withholding: Withholding,
    ) -> Self {
        self.withholding = withholding;
        self
    }
}
