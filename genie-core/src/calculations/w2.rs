//! Building a calculation request from imported W-2 forms.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{FilingStatus, TaxInput, W2Form, Withholding};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum W2ImportError {
    #[error("the primary W-2 must report wages in box 1")]
    MissingPrimaryWages,

    #[error("{0} requires a second W-2 (use zeros if the spouse had no income)")]
    MissingSpouseForm(FilingStatus),

    #[error("the W-2 {0} amounts are too large to add together")]
    AmountOverflow(&'static str),
}

impl TaxInput {
    /// Sums wages, withholding and box 12 contributions across the forms.
    ///
    /// Box 12 codes D, E, F, G and S count toward the 401(k) contribution and
    /// code W toward the HSA contribution. Married statuses need a second
    /// form, which may be all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`W2ImportError`] if the primary form has no box 1 wages, a
    /// married filer supplied only one form, or a box total overflows.
    pub fn from_w2_forms(
        primary: &W2Form,
        secondary: Option<&W2Form>,
        filing_status: FilingStatus,
        state: impl Into<String>,
    ) -> Result<Self, W2ImportError> {
        if primary.wages <= Decimal::ZERO {
            return Err(W2ImportError::MissingPrimaryWages);
        }
        if filing_status.is_married() && secondary.is_none() {
            return Err(W2ImportError::MissingSpouseForm(filing_status));
        }

        let forms: Vec<&W2Form> = std::iter::once(primary).chain(secondary).collect();
        let sum = |name: &'static str, box_value: fn(&W2Form) -> Decimal| {
            box_total(&forms, name, box_value)
        };

        let mut input = TaxInput::new(primary.wages, filing_status, state)
            .with_secondary_wages(secondary.map_or(Decimal::ZERO, |form| form.wages))
            .with_contributions(
                sum("401(k) deferral", W2Form::elective_deferral)?,
                sum("HSA contribution", W2Form::hsa_contribution)?,
            )
            .with_withholding(Withholding {
                federal: sum("federal withholding", |form| form.federal_withheld)?,
                state: sum("state withholding", |form| form.state_withheld)?,
                social_security: sum("social security withholding", |form| {
                    form.social_security_withheld
                })?,
                medicare: sum("medicare withholding", |form| form.medicare_withheld)?,
            });
        input.state = input.state.trim().to_ascii_uppercase();

        debug!(
            forms = forms.len(),
            primary_wages = %input.primary_wages,
            secondary_wages = %input.secondary_wages,
            contribution_401k = %input.contribution_401k,
            contribution_hsa = %input.contribution_hsa,
            "built tax input from W-2 forms"
        );

        Ok(input)
    }
}

fn box_total(
    forms: &[&W2Form],
    name: &'static str,
    box_value: fn(&W2Form) -> Decimal,
) -> Result<Decimal, W2ImportError> {
    forms
        .iter()
        .try_fold(Decimal::ZERO, |total, form| total.checked_add(box_value(form)))
        .ok_or(W2ImportError::AmountOverflow(name))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Box12Code, Box12Entry};

    fn primary_form() -> W2Form {
        W2Form {
            wages: dec!(85000),
            federal_withheld: dec!(9000),
            social_security_wages: dec!(97000),
            social_security_withheld: dec!(6014),
            medicare_wages: dec!(97000),
            medicare_withheld: dec!(1406.50),
            box12: Some(Box12Entry {
                code: Box12Code::parse("D"),
                amount: dec!(12000),
            }),
            state_withheld: dec!(4100),
        }
    }

    fn spouse_form() -> W2Form {
        W2Form {
            wages: dec!(40000),
            federal_withheld: dec!(3000),
            social_security_withheld: dec!(2480),
            medicare_withheld: dec!(580),
            box12: Some(Box12Entry {
                code: Box12Code::parse("W"),
                amount: dec!(3000),
            }),
            state_withheld: dec!(1500),
            ..W2Form::default()
        }
    }

    #[test]
    fn single_form_maps_boxes_to_input() {
        let input =
            TaxInput::from_w2_forms(&primary_form(), None, FilingStatus::Single, "ca").unwrap();

        assert_eq!(input.primary_wages, dec!(85000));
        assert_eq!(input.secondary_wages, dec!(0));
        assert_eq!(input.state, "CA");
        assert_eq!(input.contribution_401k, dec!(12000));
        assert_eq!(input.contribution_hsa, dec!(0));
        assert_eq!(
            input.withholding,
            Withholding {
                federal: dec!(9000),
                state: dec!(4100),
                social_security: dec!(6014),
                medicare: dec!(1406.50),
            }
        );
    }

    #[test]
    fn two_forms_are_summed() {
        let input = TaxInput::from_w2_forms(
            &primary_form(),
            Some(&spouse_form()),
            FilingStatus::MarriedJointly,
            "CA",
        )
        .unwrap();

        assert_eq!(input.gross_income(), dec!(125000));
        assert_eq!(input.contribution_401k, dec!(12000));
        assert_eq!(input.contribution_hsa, dec!(3000));
        assert_eq!(input.withholding.federal, dec!(12000));
        assert_eq!(input.withholding.state, dec!(5600));
        assert_eq!(input.withholding.total(), dec!(28080.50));
    }

    #[test]
    fn married_filers_need_second_form() {
        let result = TaxInput::from_w2_forms(
            &primary_form(),
            None,
            FilingStatus::MarriedSeparately,
            "CA",
        );

        assert_eq!(
            result,
            Err(W2ImportError::MissingSpouseForm(FilingStatus::MarriedSeparately))
        );
    }

    #[test]
    fn zero_spouse_form_is_accepted() {
        let input = TaxInput::from_w2_forms(
            &primary_form(),
            Some(&W2Form::default()),
            FilingStatus::MarriedJointly,
            "CA",
        )
        .unwrap();

        assert_eq!(input.secondary_wages, dec!(0));
        assert_eq!(input.gross_income(), dec!(85000));
    }

    #[test]
    fn oversized_withholding_is_reported_not_added() {
        let huge = Decimal::MAX / dec!(2) + dec!(1);
        let primary = W2Form {
            federal_withheld: huge,
            ..primary_form()
        };
        let spouse = W2Form {
            federal_withheld: huge,
            ..spouse_form()
        };

        let result = TaxInput::from_w2_forms(
            &primary,
            Some(&spouse),
            FilingStatus::MarriedJointly,
            "CA",
        );

        assert_eq!(result, Err(W2ImportError::AmountOverflow("federal withholding")));
    }

    #[test]
    fn primary_form_needs_wages() {
        let result =
            TaxInput::from_w2_forms(&W2Form::default(), None, FilingStatus::Single, "CA");

        assert_eq!(result, Err(W2ImportError::MissingPrimaryWages));
    }
}
