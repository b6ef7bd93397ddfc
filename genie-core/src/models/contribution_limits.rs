use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Yearly pre-tax contribution ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLimits {
    /// Elective 401(k) deferral limit, per person.
    pub max_401k: Decimal,

    /// HSA family-coverage limit, per household.
    pub hsa_family_max: Decimal,
}

impl ContributionLimits {
    /// Maximum 401(k) contribution for a household of up to two earners.
    ///
    /// Each earner may defer the lesser of their wages or the per-person
    /// limit. A secondary earner with no wages adds nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use genie_core::ContributionLimits;
    ///
    /// let limits = ContributionLimits {
    ///     max_401k: dec!(23500),
    ///     hsa_family_max: dec!(8550),
    /// };
    ///
    /// assert_eq!(limits.household_401k_limit(dec!(90000), dec!(90000)), dec!(47000));
    /// assert_eq!(limits.household_401k_limit(dec!(15000), dec!(0)), dec!(15000));
    /// ```
    pub fn household_401k_limit(
        &self,
        primary_wages: Decimal,
        secondary_wages: Decimal,
    ) -> Decimal {
        let primary = primary_wages.max(Decimal::ZERO).min(self.max_401k);
        let secondary = if secondary_wages > Decimal::ZERO {
            secondary_wages.min(self.max_401k)
        } else {
            Decimal::ZERO
        };
        primary + secondary
    }
}
