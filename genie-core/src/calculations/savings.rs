//! "What if" savings from maxing pre-tax contributions.
//!
//! This is a reduced computation, not a second pipeline run: only federal
//! bracket tax (with the standard deduction held fixed) and state tax are
//! recomputed. FICA, the itemized-vs-standard choice and credits are held
//! constant, and the 401(k) and HSA estimates are independent of each other
//! and simply added. Treat the figures as an approximation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::max;
use crate::calculations::progressive::compute_progressive_tax;
use crate::{FilingStatus, StateTaxRule, TaxInput, TaxResult, TaxTables};

/// Additional savings available from contributing up to each limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialSavings {
    /// Unused 401(k) room for the household.
    pub remaining_401k: Decimal,
    /// Unused HSA family room.
    pub remaining_hsa: Decimal,

    pub contribution_401k: Decimal,
    pub contribution_hsa: Decimal,
    pub total: Decimal,
}

impl PotentialSavings {
    pub fn has_savings(&self) -> bool {
        self.total > Decimal::ZERO
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SavingsEstimator<'a> {
    tables: &'a TaxTables,
}

impl<'a> SavingsEstimator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Estimates the extra federal and state tax saved by contributing the
    /// remaining 401(k) and HSA room on top of the current contributions.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use rust_decimal_macros::dec;
    /// # use genie_core::{
    /// #     ContributionLimits, FicaRates, FilingStatus, PerFilingStatus, StateTaxRule,
    /// #     TaxBracket, TaxInput, TaxTables, TaxYearTable,
    /// # };
    /// use genie_core::calculations::{SavingsEstimator, TaxCalculationPipeline};
    ///
    /// # let brackets = vec![
    /// #     TaxBracket::bounded(dec!(0.10), dec!(0), dec!(23850)),
    /// #     TaxBracket::bounded(dec!(0.12), dec!(23851), dec!(96950)),
    /// #     TaxBracket::unbounded(dec!(0.22), dec!(96951)),
    /// # ];
    /// # let per_status = |value| PerFilingStatus {
    /// #     single: value,
    /// #     head_of_household: value,
    /// #     married_jointly: value,
    /// #     married_separately: value,
    /// # };
    /// # let mut states = BTreeMap::new();
    /// # states.insert("TX".to_string(), StateTaxRule::NoIncomeTax);
    /// # let tables = TaxTables {
    /// #     year_table: TaxYearTable {
    /// #         year: 2025,
    /// #         federal_brackets: PerFilingStatus {
    /// #             single: brackets.clone(),
    /// #             head_of_household: brackets.clone(),
    /// #             married_jointly: brackets.clone(),
    /// #             married_separately: brackets,
    /// #         },
    /// #         standard_deductions: per_status(dec!(30000)),
    /// #         child_tax_credit_per_dependent: dec!(2000),
    /// #     },
    /// #     fica: FicaRates {
    /// #         social_security_rate: dec!(0.062),
    /// #         medicare_rate: dec!(0.0145),
    /// #         additional_medicare_rate: dec!(0.009),
    /// #         social_security_wage_base: dec!(176100),
    /// #         additional_medicare_threshold: per_status(dec!(250000)),
    /// #     },
    /// #     contribution_limits: ContributionLimits {
    /// #         max_401k: dec!(23500),
    /// #         hsa_family_max: dec!(8550),
    /// #     },
    /// #     states,
    /// # };
    /// let input = TaxInput::new(dec!(90000), FilingStatus::MarriedJointly, "TX")
    ///     .with_secondary_wages(dec!(90000))
    ///     .with_contributions(dec!(20000), dec!(0));
    /// let result = TaxCalculationPipeline::new(&tables).compute(&input);
    ///
    /// let savings = SavingsEstimator::new(&tables).estimate(&result, &input);
    ///
    /// assert_eq!(savings.remaining_401k, dec!(27000));
    /// assert_eq!(savings.contribution_401k, dec!(5940.00));
    /// assert_eq!(savings.contribution_hsa, dec!(1881.00));
    /// ```
    pub fn estimate(
        &self,
        result: &TaxResult,
        input: &TaxInput,
    ) -> PotentialSavings {
        let limits = &self.tables.contribution_limits;
        let remaining_401k = limits
            .household_401k_limit(input.primary_wages, input.secondary_wages)
            - input.contribution_401k;
        let remaining_hsa = limits.hsa_family_max - input.contribution_hsa;

        let contribution_401k = self.savings_for_room(result, remaining_401k);
        let contribution_hsa = self.savings_for_room(result, remaining_hsa);

        debug!(
            %remaining_401k,
            %remaining_hsa,
            %contribution_401k,
            %contribution_hsa,
            "estimated contribution savings"
        );

        PotentialSavings {
            remaining_401k: max(remaining_401k, Decimal::ZERO),
            remaining_hsa: max(remaining_hsa, Decimal::ZERO),
            contribution_401k,
            contribution_hsa,
            total: contribution_401k + contribution_hsa,
        }
    }

    fn savings_for_room(
        &self,
        result: &TaxResult,
        room: Decimal,
    ) -> Decimal {
        if room <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.marginal_savings(
            result.filing_status,
            &result.state,
            result.adjusted_gross_income,
            room,
        )
    }

    /// Federal plus state tax saved by lowering AGI from `agi_before` by
    /// `extra_contribution`.
    ///
    /// Federal tax is compared on `AGI - standard deduction` at both levels.
    /// Progressive states compare bracket tax at both AGI levels; flat states
    /// save `extra_contribution * rate`.
    pub fn marginal_savings(
        &self,
        status: FilingStatus,
        state: &str,
        agi_before: Decimal,
        extra_contribution: Decimal,
    ) -> Decimal {
        let year_table = &self.tables.year_table;
        let standard_deduction = year_table.standard_deduction(status);
        let brackets = year_table.brackets(status);
        let agi_after = max(agi_before - extra_contribution, Decimal::ZERO);

        let federal_before =
            compute_progressive_tax(max(agi_before - standard_deduction, Decimal::ZERO), brackets);
        let federal_after =
            compute_progressive_tax(max(agi_after - standard_deduction, Decimal::ZERO), brackets);

        let state_savings = match self.tables.state_rule(state) {
            Some(StateTaxRule::Progressive { brackets }) => {
                compute_progressive_tax(agi_before, brackets)
                    - compute_progressive_tax(agi_after, brackets)
            }
            Some(StateTaxRule::Flat { rate }) => extra_contribution * *rate,
            Some(StateTaxRule::NoIncomeTax) | None => Decimal::ZERO,
        };

        (federal_before - federal_after) + state_savings
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::TaxCalculationPipeline;
    use crate::calculations::test_support::tables_2025;

    fn estimate(input: &TaxInput) -> PotentialSavings {
        let tables = tables_2025();
        let result = TaxCalculationPipeline::new(&tables).compute(input);
        SavingsEstimator::new(&tables).estimate(&result, input)
    }

    // =========================================================================
    // estimate tests
    // =========================================================================

    #[test]
    fn two_earner_household_gets_room_for_both_limits() {
        let input = TaxInput::new(dec!(90000), FilingStatus::MarriedJointly, "TX")
            .with_secondary_wages(dec!(90000))
            .with_contributions(dec!(20000), dec!(0));

        let savings = estimate(&input);

        assert_eq!(savings.remaining_401k, dec!(27000));
        assert_eq!(savings.contribution_401k, dec!(5940.00));
        assert_eq!(savings.remaining_hsa, dec!(8550));
        assert_eq!(savings.contribution_hsa, dec!(1881.00));
        assert_eq!(savings.total, dec!(7821.00));
        assert!(savings.has_savings());
    }

    #[test]
    fn maxed_contributions_leave_no_savings() {
        let input = TaxInput::new(dec!(120000), FilingStatus::Single, "CA")
            .with_contributions(dec!(23500), dec!(8550));

        let savings = estimate(&input);

        assert_eq!(savings, PotentialSavings::default());
        assert!(!savings.has_savings());
    }

    #[test]
    fn over_limit_contributions_report_zero_room() {
        let input = TaxInput::new(dec!(120000), FilingStatus::Single, "TX")
            .with_contributions(dec!(30000), dec!(9000));

        let savings = estimate(&input);

        assert_eq!(savings.remaining_401k, dec!(0));
        assert_eq!(savings.remaining_hsa, dec!(0));
        assert_eq!(savings.total, dec!(0));
    }

    #[test]
    fn flat_state_adds_rate_times_extra_contribution() {
        // AGI 56500, HSA room 8550 stays in the 12% bracket: 8550 * 0.12 + 8550 * 0.0495
        let input = TaxInput::new(dec!(80000), FilingStatus::Single, "IL")
            .with_contributions(dec!(23500), dec!(0));

        let savings = estimate(&input);

        assert_eq!(savings.contribution_401k, dec!(0));
        assert_eq!(savings.contribution_hsa, dec!(1449.225));
    }

    #[test]
    fn estimates_are_independent_and_additive() {
        let input = TaxInput::new(dec!(150000), FilingStatus::Single, "CA");
        let tables = tables_2025();
        let result = TaxCalculationPipeline::new(&tables).compute(&input);
        let estimator = SavingsEstimator::new(&tables);

        let savings = estimator.estimate(&result, &input);

        assert_eq!(
            savings.contribution_401k,
            estimator.marginal_savings(
                FilingStatus::Single,
                "CA",
                result.adjusted_gross_income,
                dec!(23500)
            )
        );
        assert_eq!(
            savings.total,
            savings.contribution_401k + savings.contribution_hsa
        );
    }

    // =========================================================================
    // marginal_savings tests
    // =========================================================================

    #[test]
    fn marginal_savings_progressive_state_compares_bracket_tax() {
        let tables = tables_2025();
        let estimator = SavingsEstimator::new(&tables);

        // Federal: 10000 * 0.22. State: AGI 100000 -> 90000, all within 9.3%.
        let savings = estimator.marginal_savings(FilingStatus::Single, "CA", dec!(100000), dec!(10000));

        assert_eq!(savings, dec!(3130.000));
    }

    #[test]
    fn marginal_savings_stops_at_zero_taxable_income() {
        let tables = tables_2025();
        let estimator = SavingsEstimator::new(&tables);

        // Taxable income 5000 falls to 0; only 5000 * 0.10 is saved.
        let savings = estimator.marginal_savings(FilingStatus::Single, "TX", dec!(20000), dec!(8550));

        assert_eq!(savings, dec!(500.00));
    }

    #[test]
    fn marginal_savings_unknown_state_counts_federal_only() {
        let tables = tables_2025();
        let estimator = SavingsEstimator::new(&tables);

        let savings = estimator.marginal_savings(FilingStatus::Single, "ZZ", dec!(100000), dec!(1000));

        assert_eq!(savings, dec!(220.00));
    }
}
