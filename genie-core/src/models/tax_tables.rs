use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ContributionLimits, FicaRates, StateTaxRule, TaxYearTable};

/// Every table a calculation reads, loaded once and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTables {
    pub year_table: TaxYearTable,
    pub fica: FicaRates,
    pub contribution_limits: ContributionLimits,

    /// Keyed by two-letter state code.
    pub states: BTreeMap<String, StateTaxRule>,
}

impl TaxTables {
    pub fn year(&self) -> i32 {
        self.year_table.year
    }

    pub fn state_rule(
        &self,
        state: &str,
    ) -> Option<&StateTaxRule> {
        self.states.get(state)
    }

    pub fn state_codes(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}
