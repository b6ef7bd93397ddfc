use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, ItemizedDeductions, Withholding};

/// Which deduction was actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionType {
    Standard,
    Itemized,
}

/// Payroll taxes on gross wages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaTaxes {
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub additional_medicare: Decimal,
}

impl FicaTaxes {
    pub fn total(&self) -> Decimal {
        self.social_security + self.medicare + self.additional_medicare
    }
}

/// Outcome of one pipeline run. Amounts are unrounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_year: i32,

    // Echoed inputs
    pub filing_status: FilingStatus,
    pub state: String,
    pub gross_income: Decimal,
    pub contribution_401k: Decimal,
    pub contribution_hsa: Decimal,
    pub capital_loss: Decimal,
    pub dependents: u32,
    pub itemized_deductions: ItemizedDeductions,
    pub withholding: Withholding,

    // Payroll
    pub fica: FicaTaxes,
    pub total_fica_tax: Decimal,

    // Income and deductions
    pub capital_loss_deduction: Decimal,
    pub capital_loss_carryforward: Decimal,
    pub adjusted_gross_income: Decimal,
    pub standard_deduction: Decimal,
    pub itemized_total: Decimal,
    pub deductible_medical_expenses: Decimal,
    pub deduction: Decimal,
    pub deduction_type: DeductionType,
    pub taxable_income: Decimal,

    // Income tax
    pub federal_tax_before_credits: Decimal,

    /// Full credit for the household's dependents.
    pub child_credit: Decimal,

    /// Portion of the credit that reduced federal tax.
    pub child_credit_applied: Decimal,

    pub federal_tax: Decimal,
    pub state_tax: Decimal,

    // Totals
    pub total_tax: Decimal,
    pub total_tax_owed: Decimal,
    pub total_withheld: Decimal,

    /// Positive for a refund, negative for an amount owed.
    pub refund_or_owed: Decimal,

    pub effective_rate: Decimal,
    pub effective_rate_with_fica: Decimal,

    /// Federal and state tax already avoided by the current 401(k) and HSA contributions.
    pub contribution_tax_savings: Decimal,
}

impl TaxResult {
    pub fn is_refund(&self) -> bool {
        self.refund_or_owed > Decimal::ZERO
    }

    pub fn used_itemized_deduction(&self) -> bool {
        self.deduction_type == DeductionType::Itemized
    }
}
