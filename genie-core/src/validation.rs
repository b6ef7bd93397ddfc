//! Range checks a caller runs on a [`TaxInput`] before calculating.
//!
//! The pipeline itself never validates; it is only defined for in-range
//! inputs. These checks mirror what an entry form enforces.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ContributionLimits, TaxInput};

/// Largest gross income accepted for a calculation.
pub const MAX_GROSS_INCOME: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Largest value accepted for any single amount on the input.
pub const MAX_AMOUNT: Decimal = MAX_GROSS_INCOME;

/// The first out-of-range value found in an input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputOutOfRange {
    #[error("please enter a valid positive income")]
    NonPositiveIncome,

    #[error("income {0} exceeds the supported maximum of 10,000,000")]
    IncomeTooLarge(Decimal),

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },

    #[error("{field} {value} exceeds the supported maximum of 10,000,000")]
    AmountTooLarge { field: &'static str, value: Decimal },

    #[error("401(k) contribution {contribution} cannot exceed total income {income}")]
    ContributionExceedsIncome {
        contribution: Decimal,
        income: Decimal,
    },

    #[error("401(k) contribution {contribution} exceeds the household limit of {limit}")]
    Contribution401kOverLimit {
        contribution: Decimal,
        limit: Decimal,
    },

    #[error("HSA contribution {contribution} exceeds the family limit of {limit}")]
    HsaOverLimit {
        contribution: Decimal,
        limit: Decimal,
    },
}

/// Validates `input` against the ranges an entry form enforces.
///
/// # Errors
///
/// Returns the first [`InputOutOfRange`] found, checking income first, then
/// sign and size of every amount, then contribution limits. Wages whose sum
/// does not fit in a [`Decimal`] are reported as [`InputOutOfRange::IncomeTooLarge`].
pub fn validate_input(
    input: &TaxInput,
    limits: &ContributionLimits,
) -> Result<(), InputOutOfRange> {
    let Some(income) = input.primary_wages.checked_add(input.secondary_wages) else {
        return Err(InputOutOfRange::IncomeTooLarge(Decimal::MAX));
    };
    if income <= Decimal::ZERO {
        return Err(InputOutOfRange::NonPositiveIncome);
    }
    if income > MAX_GROSS_INCOME {
        return Err(InputOutOfRange::IncomeTooLarge(income));
    }

    let amounts = [
        ("primary wages", input.primary_wages),
        ("secondary wages", input.secondary_wages),
        ("401(k) contribution", input.contribution_401k),
        ("HSA contribution", input.contribution_hsa),
        ("capital loss", input.capital_loss),
        ("mortgage interest", input.itemized.mortgage_interest),
        ("property taxes", input.itemized.property_taxes),
        ("charitable donations", input.itemized.charitable_donations),
        ("medical expenses", input.itemized.medical_expenses),
        ("federal withholding", input.withholding.federal),
        ("state withholding", input.withholding.state),
        ("social security withholding", input.withholding.social_security),
        ("medicare withholding", input.withholding.medicare),
    ];
    if let Some((field, value)) = amounts.iter().copied().find(|(_, value)| *value < Decimal::ZERO) {
        return Err(InputOutOfRange::Negative { field, value });
    }
    if let Some((field, value)) = amounts.iter().copied().find(|(_, value)| *value > MAX_AMOUNT) {
        return Err(InputOutOfRange::AmountTooLarge { field, value });
    }

    if input.contribution_401k > income {
        return Err(InputOutOfRange::ContributionExceedsIncome {
            contribution: input.contribution_401k,
            income,
        });
    }

    let limit_401k = limits.household_401k_limit(input.primary_wages, input.secondary_wages);
    if input.contribution_401k > limit_401k {
        return Err(InputOutOfRange::Contribution401kOverLimit {
            contribution: input.contribution_401k,
            limit: limit_401k,
        });
    }

    if input.contribution_hsa > limits.hsa_family_max {
        return Err(InputOutOfRange::HsaOverLimit {
            contribution: input.contribution_hsa,
            limit: limits.hsa_family_max,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{FilingStatus, ItemizedDeductions, Withholding};

    fn limits() -> ContributionLimits {
        ContributionLimits {
            max_401k: dec!(23500),
            hsa_family_max: dec!(8550),
        }
    }

    fn valid_input() -> TaxInput {
        TaxInput::new(dec!(90000), FilingStatus::MarriedJointly, "CA")
            .with_secondary_wages(dec!(90000))
            .with_contributions(dec!(20000), dec!(4000))
    }

    #[test]
    fn accepts_in_range_input() {
        assert_eq!(validate_input(&valid_input(), &limits()), Ok(()));
    }

    #[test]
    fn rejects_zero_income() {
        let input = TaxInput::new(dec!(0), FilingStatus::Single, "CA");

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::NonPositiveIncome)
        );
    }

    #[test]
    fn rejects_income_above_maximum() {
        let input = TaxInput::new(dec!(10000000.01), FilingStatus::Single, "CA");

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::IncomeTooLarge(dec!(10000000.01)))
        );
    }

    #[test]
    fn accepts_income_at_maximum() {
        let input = TaxInput::new(dec!(10000000), FilingStatus::Single, "CA");

        assert_eq!(validate_input(&input, &limits()), Ok(()));
    }

    #[test]
    fn rejects_negative_capital_loss() {
        let input = valid_input().with_capital_loss(dec!(-1));

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::Negative {
                field: "capital loss",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn rejects_401k_above_income() {
        let input = TaxInput::new(dec!(10000), FilingStatus::Single, "CA")
            .with_contributions(dec!(12000), dec!(0));

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::ContributionExceedsIncome {
                contribution: dec!(12000),
                income: dec!(10000),
            })
        );
    }

    #[test]
    fn rejects_401k_above_household_limit() {
        let input = TaxInput::new(dec!(90000), FilingStatus::MarriedJointly, "CA")
            .with_secondary_wages(dec!(10000))
            .with_contributions(dec!(35000), dec!(0));

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::Contribution401kOverLimit {
                contribution: dec!(35000),
                limit: dec!(33500),
            })
        );
    }

    #[test]
    fn rejects_hsa_above_family_limit() {
        let input = valid_input().with_contributions(dec!(0), dec!(9000));

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::HsaOverLimit {
                contribution: dec!(9000),
                limit: dec!(8550),
            })
        );
    }

    #[test]
    fn rejects_oversized_withholding() {
        let huge = Decimal::MAX / dec!(2) + dec!(1);
        let input = valid_input().with_withholding(Withholding {
            federal: huge,
            state: huge,
            ..Default::default()
        });

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::AmountTooLarge {
                field: "federal withholding",
                value: huge,
            })
        );
    }

    #[test]
    fn rejects_oversized_itemized_amount() {
        let input = valid_input().with_itemized(ItemizedDeductions {
            mortgage_interest: dec!(10000000.01),
            ..Default::default()
        });

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::AmountTooLarge {
                field: "mortgage interest",
                value: dec!(10000000.01),
            })
        );
    }

    #[test]
    fn rejects_wages_whose_sum_overflows() {
        let huge = Decimal::MAX / dec!(2) + dec!(1);
        let input = TaxInput::new(huge, FilingStatus::MarriedJointly, "CA")
            .with_secondary_wages(huge);

        assert_eq!(
            validate_input(&input, &limits()),
            Err(InputOutOfRange::IncomeTooLarge(Decimal::MAX))
        );
    }

    #[test]
    fn accepted_amounts_sum_without_overflow() {
        let input = TaxInput::new(dec!(5000000), FilingStatus::MarriedJointly, "CA")
            .with_secondary_wages(dec!(5000000))
            .with_withholding(Withholding {
                federal: MAX_AMOUNT,
                state: MAX_AMOUNT,
                social_security: MAX_AMOUNT,
                medicare: MAX_AMOUNT,
            });

        assert_eq!(validate_input(&input, &limits()), Ok(()));
        assert_eq!(input.withholding.total(), dec!(40000000));
    }

    #[test]
    fn error_messages_read_naturally() {
        let err = InputOutOfRange::IncomeTooLarge(dec!(20000000));

        assert_eq!(
            err.to_string(),
            "income 20000000 exceeds the supported maximum of 10,000,000"
        );
    }
}
