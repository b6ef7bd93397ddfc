use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, PerFilingStatus};

/// Payroll tax rates and thresholds (employee share).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaRates {
    pub social_security_rate: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,

    /// Maximum wages subject to social security tax.
    pub social_security_wage_base: Decimal,

    /// Wages above this amount owe the additional Medicare surtax.
    pub additional_medicare_threshold: PerFilingStatus<Decimal>,
}

impl FicaRates {
    pub fn additional_medicare_threshold(
        &self,
        status: FilingStatus,
    ) -> Decimal {
        *self.additional_medicare_threshold.get(status)
    }
}
