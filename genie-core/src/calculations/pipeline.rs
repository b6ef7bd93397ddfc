//! The full tax computation for one household.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | FICA on gross wages (social security, Medicare, additional Medicare) |
//! | 2    | Capital loss deduction (1,500 cap for married filing separately, else 3,000) and carryforward |
//! | 3    | AGI: gross minus 401(k), HSA and the capital loss deduction, minimum 0 |
//! | 4    | Deduction: itemized if requested and larger than standard, else standard |
//! | 5    | Taxable income: AGI minus deduction, minimum 0 |
//! | 6    | Federal tax from brackets, less the child tax credit, minimum 0 |
//! | 7    | State tax on AGI (progressive, flat or none) |
//! | 8    | Totals, withholding reconciliation and effective rates |
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use genie_core::calculations::TaxCalculationPipeline;
//! use genie_core::{
//!     ContributionLimits, FicaRates, FilingStatus, PerFilingStatus, StateTaxRule, TaxBracket,
//!     TaxInput, TaxTables, TaxYearTable,
//! };
//!
//! let brackets = vec![
//!     TaxBracket::bounded(dec!(0.10), dec!(0), dec!(11925)),
//!     TaxBracket::bounded(dec!(0.12), dec!(11926), dec!(48475)),
//!     TaxBracket::unbounded(dec!(0.22), dec!(48476)),
//! ];
//! let per_status = |value| PerFilingStatus {
//!     single: value,
//!     head_of_household: value,
//!     married_jointly: value,
//!     married_separately: value,
//! };
//! let mut states = BTreeMap::new();
//! states.insert("TX".to_string(), StateTaxRule::NoIncomeTax);
//!
//! let tables = TaxTables {
//!     year_table: TaxYearTable {
//!         year: 2025,
//!         federal_brackets: PerFilingStatus {
//!             single: brackets.clone(),
//!             head_of_household: brackets.clone(),
//!             married_jointly: brackets.clone(),
//!             married_separately: brackets,
//!         },
//!         standard_deductions: per_status(dec!(15000)),
//!         child_tax_credit_per_dependent: dec!(2000),
//!     },
//!     fica: FicaRates {
//!         social_security_rate: dec!(0.062),
//!         medicare_rate: dec!(0.0145),
//!         additional_medicare_rate: dec!(0.009),
//!         social_security_wage_base: dec!(176100),
//!         additional_medicare_threshold: per_status(dec!(200000)),
//!     },
//!     contribution_limits: ContributionLimits {
//!         max_401k: dec!(23500),
//!         hsa_family_max: dec!(8550),
//!     },
//!     states,
//! };
//!
//! let input = TaxInput::new(dec!(100000), FilingStatus::Single, "TX");
//! let result = TaxCalculationPipeline::new(&tables).compute(&input);
//!
//! assert_eq!(result.taxable_income, dec!(85000));
//! assert_eq!(result.federal_tax, dec!(13614.00));
//! assert_eq!(result.total_fica_tax, dec!(7650.00));
//! assert_eq!(result.refund_or_owed, dec!(-21264.00));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{max, ratio_or_zero};
use crate::calculations::progressive::compute_progressive_tax;
use crate::calculations::savings::SavingsEstimator;
use crate::{
    DeductionMethod, DeductionType, FicaTaxes, FilingStatus, StateTaxRule, TaxInput, TaxResult,
    TaxTables,
};

/// Capital loss deductible against ordinary income per year.
const CAPITAL_LOSS_CAP: Decimal = Decimal::from_parts(3000, 0, 0, false, 0);

/// Capital loss cap for married filing separately.
const CAPITAL_LOSS_CAP_SEPARATE: Decimal = Decimal::from_parts(1500, 0, 0, false, 0);

/// Share of AGI that medical expenses must exceed before they are deductible (7.5%).
const MEDICAL_AGI_FLOOR: Decimal = Decimal::from_parts(75, 0, 0, false, 3);

/// Runs the tax computation against a shared, read-only set of tables.
///
/// The pipeline holds no state of its own; the same input always produces
/// the same result.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculationPipeline<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxCalculationPipeline<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Computes every tax figure for `input`.
    ///
    /// Inputs are assumed to be validated; out-of-range amounts are clamped
    /// at zero where a step would otherwise go negative rather than rejected.
    pub fn compute(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        let status = input.filing_status;
        let gross_income = input.gross_income();

        // Step 1: FICA, on wages before any pre-tax contribution
        let fica = self.fica_taxes(gross_income, status);
        let total_fica_tax = fica.total();

        // Step 2: Capital loss
        let (capital_loss_deduction, capital_loss_carryforward) =
            self.capital_loss_deduction(input.capital_loss, status);

        // Step 3: AGI
        let adjusted_gross_income = self.adjusted_gross_income(
            gross_income,
            input.contribution_401k + input.contribution_hsa,
            capital_loss_deduction,
        );

        // Step 4: Standard vs itemized
        let standard_deduction = self.tables.year_table.standard_deduction(status);
        let (itemized_total, deductible_medical_expenses) = match input.deduction_method {
            DeductionMethod::Itemized => self.itemized_total(input, adjusted_gross_income),
            DeductionMethod::Standard => (Decimal::ZERO, Decimal::ZERO),
        };
        let (deduction, deduction_type) = self.select_deduction(
            input.deduction_method,
            itemized_total,
            standard_deduction,
        );

        // Step 5: Taxable income
        let taxable_income = self.taxable_income(adjusted_gross_income, deduction);

        // Step 6: Federal tax and child credit
        let federal_tax_before_credits =
            compute_progressive_tax(taxable_income, self.tables.year_table.brackets(status));
        let child_credit = self.child_credit(input.dependents);
        let federal_tax = max(federal_tax_before_credits - child_credit, Decimal::ZERO);
        let child_credit_applied = federal_tax_before_credits - federal_tax;

        // Step 7: State tax
        let state_tax = self.state_tax(&input.state, adjusted_gross_income);

        // Step 8: Totals and withholding
        let total_tax = federal_tax + state_tax;
        let total_tax_owed = total_tax + total_fica_tax;
        let total_withheld = input.withholding.total();
        let refund_or_owed = total_withheld - total_tax_owed;

        let contribution_tax_savings =
            self.contribution_tax_savings(input, gross_income, capital_loss_deduction);

        debug!(
            %gross_income,
            %adjusted_gross_income,
            %taxable_income,
            %federal_tax,
            %state_tax,
            %total_fica_tax,
            %refund_or_owed,
            "tax calculation complete"
        );

        TaxResult {
            tax_year: self.tables.year(),
            filing_status: status,
            state: input.state.clone(),
            gross_income,
            contribution_401k: input.contribution_401k,
            contribution_hsa: input.contribution_hsa,
            capital_loss: input.capital_loss,
            dependents: input.dependents,
            itemized_deductions: input.itemized.clone(),
            withholding: input.withholding.clone(),
            fica,
            total_fica_tax,
            capital_loss_deduction,
            capital_loss_carryforward,
            adjusted_gross_income,
            standard_deduction,
            itemized_total,
            deductible_medical_expenses,
            deduction,
            deduction_type,
            taxable_income,
            federal_tax_before_credits,
            child_credit,
            child_credit_applied,
            federal_tax,
            state_tax,
            total_tax,
            total_tax_owed,
            total_withheld,
            refund_or_owed,
            effective_rate: ratio_or_zero(total_tax, gross_income),
            effective_rate_with_fica: ratio_or_zero(total_tax_owed, gross_income),
            contribution_tax_savings,
        }
    }

    /// Social security (capped at the wage base), Medicare, and the
    /// additional Medicare surtax above the filing-status threshold.
    fn fica_taxes(
        &self,
        gross_income: Decimal,
        status: FilingStatus,
    ) -> FicaTaxes {
        let rates = &self.tables.fica;
        let social_security_wages = gross_income.min(rates.social_security_wage_base);
        let threshold = rates.additional_medicare_threshold(status);

        FicaTaxes {
            social_security: social_security_wages * rates.social_security_rate,
            medicare: gross_income * rates.medicare_rate,
            additional_medicare: max(gross_income - threshold, Decimal::ZERO)
                * rates.additional_medicare_rate,
        }
    }

    /// Returns `(deduction, carryforward)`.
    fn capital_loss_deduction(
        &self,
        capital_loss: Decimal,
        status: FilingStatus,
    ) -> (Decimal, Decimal) {
        let cap = match status {
            FilingStatus::MarriedSeparately => CAPITAL_LOSS_CAP_SEPARATE,
            _ => CAPITAL_LOSS_CAP,
        };
        let deduction = capital_loss.min(cap);
        (deduction, max(capital_loss - cap, Decimal::ZERO))
    }

    fn adjusted_gross_income(
        &self,
        gross_income: Decimal,
        pre_tax_contributions: Decimal,
        capital_loss_deduction: Decimal,
    ) -> Decimal {
        let agi = gross_income - pre_tax_contributions - capital_loss_deduction;
        if agi < Decimal::ZERO {
            warn!(
                %gross_income,
                %pre_tax_contributions,
                "deductions exceed gross income; clamping AGI to zero"
            );
        }
        max(agi, Decimal::ZERO)
    }

    /// Returns `(itemized total, deductible medical expenses)`.
    fn itemized_total(
        &self,
        input: &TaxInput,
        adjusted_gross_income: Decimal,
    ) -> (Decimal, Decimal) {
        let itemized = &input.itemized;
        let medical_floor = adjusted_gross_income * MEDICAL_AGI_FLOOR;
        let deductible_medical = max(itemized.medical_expenses - medical_floor, Decimal::ZERO);

        let total = itemized.mortgage_interest
            + itemized.property_taxes
            + itemized.charitable_donations
            + deductible_medical;
        (total, deductible_medical)
    }

    /// Itemized wins only when requested and strictly larger than standard.
    fn select_deduction(
        &self,
        method: DeductionMethod,
        itemized_total: Decimal,
        standard_deduction: Decimal,
    ) -> (Decimal, DeductionType) {
        if method == DeductionMethod::Itemized && itemized_total > standard_deduction {
            (itemized_total, DeductionType::Itemized)
        } else {
            (standard_deduction, DeductionType::Standard)
        }
    }

    fn taxable_income(
        &self,
        adjusted_gross_income: Decimal,
        deduction: Decimal,
    ) -> Decimal {
        max(adjusted_gross_income - deduction, Decimal::ZERO)
    }

    fn child_credit(
        &self,
        dependents: u32,
    ) -> Decimal {
        self.tables.year_table.child_tax_credit_per_dependent * Decimal::from(dependents)
    }

    /// State tax on AGI. States have no deduction step of their own.
    fn state_tax(
        &self,
        state: &str,
        adjusted_gross_income: Decimal,
    ) -> Decimal {
        match self.tables.state_rule(state) {
            Some(StateTaxRule::Progressive { brackets }) => {
                compute_progressive_tax(adjusted_gross_income, brackets)
            }
            Some(StateTaxRule::Flat { rate }) => adjusted_gross_income * *rate,
            Some(StateTaxRule::NoIncomeTax) => Decimal::ZERO,
            None => {
                warn!(state, "no tax rule for state; assuming no state income tax");
                Decimal::ZERO
            }
        }
    }

    /// Federal and state tax the current contributions already save, using
    /// the same reduced what-if math as [`SavingsEstimator`].
    fn contribution_tax_savings(
        &self,
        input: &TaxInput,
        gross_income: Decimal,
        capital_loss_deduction: Decimal,
    ) -> Decimal {
        let contributions = input.contribution_401k + input.contribution_hsa;
        if contributions <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let agi_without_contributions =
            max(gross_income - capital_loss_deduction, Decimal::ZERO);
        SavingsEstimator::new(self.tables).marginal_savings(
            input.filing_status,
            &input.state,
            agi_without_contributions,
            contributions,
        )
    }
}
