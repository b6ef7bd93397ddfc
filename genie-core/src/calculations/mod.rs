//! Tax calculations.
//!
//! [`TaxCalculationPipeline`] runs the full computation for one request,
//! [`SavingsEstimator`] answers the "what if I maxed my contributions"
//! question from a finished result, and [`progressive`] holds the bracket
//! walk both of them share.

pub mod common;
pub mod pipeline;
pub mod progressive;
pub mod savings;
pub mod w2;

pub use pipeline::TaxCalculationPipeline;
pub use progressive::{
    BracketScheduleError, BracketSlice, bracket_slices, compute_progressive_tax, marginal_rate,
    validate_schedule,
};
pub use savings::{PotentialSavings, SavingsEstimator};
pub use w2::W2ImportError;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use crate::{
        ContributionLimits, FicaRates, PerFilingStatus, StateTaxRule, TaxBracket, TaxTables,
        TaxYearTable,
    };

    fn single_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0.10), dec!(0), dec!(11925)),
            TaxBracket::bounded(dec!(0.12), dec!(11926), dec!(48475)),
            TaxBracket::bounded(dec!(0.22), dec!(48476), dec!(103350)),
            TaxBracket::bounded(dec!(0.24), dec!(103351), dec!(197300)),
            TaxBracket::bounded(dec!(0.32), dec!(197301), dec!(250525)),
            TaxBracket::bounded(dec!(0.35), dec!(250526), dec!(626350)),
            TaxBracket::unbounded(dec!(0.37), dec!(626351)),
        ]
    }

    fn married_jointly_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0.10), dec!(0), dec!(23850)),
            TaxBracket::bounded(dec!(0.12), dec!(23851), dec!(96950)),
            TaxBracket::bounded(dec!(0.22), dec!(96951), dec!(206700)),
            TaxBracket::bounded(dec!(0.24), dec!(206701), dec!(394600)),
            TaxBracket::bounded(dec!(0.32), dec!(394601), dec!(501050)),
            TaxBracket::bounded(dec!(0.35), dec!(501051), dec!(751600)),
            TaxBracket::unbounded(dec!(0.37), dec!(751601)),
        ]
    }

    fn married_separately_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0.10), dec!(0), dec!(11925)),
            TaxBracket::bounded(dec!(0.12), dec!(11926), dec!(48475)),
            TaxBracket::bounded(dec!(0.22), dec!(48476), dec!(103350)),
            TaxBracket::bounded(dec!(0.24), dec!(103351), dec!(197300)),
            TaxBracket::bounded(dec!(0.32), dec!(197301), dec!(250525)),
            TaxBracket::bounded(dec!(0.35), dec!(250526), dec!(375800)),
            TaxBracket::unbounded(dec!(0.37), dec!(375801)),
        ]
    }

    fn head_of_household_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0.10), dec!(0), dec!(17000)),
            TaxBracket::bounded(dec!(0.12), dec!(17001), dec!(64850)),
            TaxBracket::bounded(dec!(0.22), dec!(64851), dec!(103350)),
            TaxBracket::bounded(dec!(0.24), dec!(103351), dec!(197300)),
            TaxBracket::bounded(dec!(0.32), dec!(197301), dec!(250500)),
            TaxBracket::bounded(dec!(0.35), dec!(250501), dec!(626350)),
            TaxBracket::unbounded(dec!(0.37), dec!(626351)),
        ]
    }

    fn california_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0.01), dec!(0), dec!(10756)),
            TaxBracket::bounded(dec!(0.02), dec!(10757), dec!(25499)),
            TaxBracket::bounded(dec!(0.04), dec!(25500), dec!(40245)),
            TaxBracket::bounded(dec!(0.06), dec!(40246), dec!(55866)),
            TaxBracket::bounded(dec!(0.08), dec!(55867), dec!(70606)),
            TaxBracket::bounded(dec!(0.093), dec!(70607), dec!(360659)),
            TaxBracket::bounded(dec!(0.103), dec!(360660), dec!(432787)),
            TaxBracket::bounded(dec!(0.113), dec!(432788), dec!(721314)),
            TaxBracket::unbounded(dec!(0.123), dec!(721315)),
        ]
    }

    /// 2025 tables with three representative states: CA (progressive),
    /// IL (flat 4.95%) and TX (no income tax).
    pub(crate) fn tables_2025() -> TaxTables {
        let mut states = BTreeMap::new();
        states.insert(
            "CA".to_string(),
            StateTaxRule::Progressive {
                brackets: california_brackets(),
            },
        );
        states.insert("IL".to_string(), StateTaxRule::Flat { rate: dec!(0.0495) });
        states.insert("TX".to_string(), StateTaxRule::NoIncomeTax);

        TaxTables {
            year_table: TaxYearTable {
                year: 2025,
                federal_brackets: PerFilingStatus {
                    single: single_brackets(),
                    head_of_household: head_of_household_brackets(),
                    married_jointly: married_jointly_brackets(),
                    married_separately: married_separately_brackets(),
                },
                standard_deductions: PerFilingStatus {
                    single: dec!(15000),
                    head_of_household: dec!(22500),
                    married_jointly: dec!(30000),
                    married_separately: dec!(15000),
                },
                child_tax_credit_per_dependent: dec!(2000),
            },
            fica: FicaRates {
                social_security_rate: dec!(0.062),
                medicare_rate: dec!(0.0145),
                additional_medicare_rate: dec!(0.009),
                social_security_wage_base: dec!(176100),
                additional_medicare_threshold: PerFilingStatus {
                    single: dec!(200000),
                    head_of_household: dec!(200000),
                    married_jointly: dec!(250000),
                    married_separately: dec!(125000),
                },
            },
            contribution_limits: ContributionLimits {
                max_401k: dec!(23500),
                hsa_family_max: dec!(8550),
            },
            states,
        }
    }
}
