//! Progressive (bracketed) tax computation.
//!
//! The same walk is used for the federal schedule and for progressive state
//! schedules: brackets are visited in ascending order, each absorbs at most
//! its own width of the income still unallocated, and the walk stops once
//! nothing remains.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use genie_core::TaxBracket;
//! use genie_core::calculations::compute_progressive_tax;
//!
//! let brackets = vec![
//!     TaxBracket::bounded(dec!(0.10), dec!(0), dec!(11925)),
//!     TaxBracket::bounded(dec!(0.12), dec!(11926), dec!(48475)),
//!     TaxBracket::unbounded(dec!(0.22), dec!(48476)),
//! ];
//!
//! assert_eq!(compute_progressive_tax(dec!(0), &brackets), dec!(0));
//! assert_eq!(compute_progressive_tax(dec!(48475), &brackets), dec!(5578.50));
//! assert_eq!(compute_progressive_tax(dec!(85000), &brackets), dec!(13614.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;

/// Reasons a bracket schedule cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketScheduleError {
    #[error("bracket schedule is empty")]
    Empty,

    #[error("first bracket must start at 0, starts at {0}")]
    FirstBracketNotZero(Decimal),

    #[error("bracket {index} rate {rate} is outside [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} max {max} is below its min {min}")]
    InvertedBounds {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index} starts at {min}, expected {expected}")]
    NotContiguous {
        index: usize,
        min: Decimal,
        expected: Decimal,
    },

    #[error("bracket {index} has no upper bound but is not the last bracket")]
    UnboundedBeforeEnd { index: usize },
}

/// The part of an income that fell into one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    pub amount: Decimal,
    pub tax: Decimal,
}

/// Checks that a schedule partitions `[0, ∞)` without gaps or overlaps.
///
/// Bracket `i + 1` must start one unit above the max of bracket `i`, and only
/// the last bracket may be unbounded. A bounded last bracket is accepted;
/// income above it is simply left untaxed.
pub fn validate_schedule(brackets: &[TaxBracket]) -> Result<(), BracketScheduleError> {
    let first = brackets.first().ok_or(BracketScheduleError::Empty)?;
    if !first.min.is_zero() {
        return Err(BracketScheduleError::FirstBracketNotZero(first.min));
    }

    let last_index = brackets.len() - 1;
    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(BracketScheduleError::InvalidRate {
                index,
                rate: bracket.rate,
            });
        }

        match bracket.max {
            Some(max) if max < bracket.min => {
                return Err(BracketScheduleError::InvertedBounds {
                    index,
                    min: bracket.min,
                    max,
                });
            }
            None if index != last_index => {
                return Err(BracketScheduleError::UnboundedBeforeEnd { index });
            }
            _ => {}
        }

        if let (Some(next), Some(max)) = (brackets.get(index + 1), bracket.max) {
            let expected = max + Decimal::ONE;
            if next.min != expected {
                return Err(BracketScheduleError::NotContiguous {
                    index: index + 1,
                    min: next.min,
                    expected,
                });
            }
        }
    }

    Ok(())
}

/// Computes the tax owed on `income` under an ascending bracket schedule.
///
/// Income of zero (or less) owes nothing. Income beyond every finite bracket
/// is absorbed by the unbounded top bracket.
pub fn compute_progressive_tax(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    bracket_slices(income, brackets)
        .iter()
        .map(|slice| slice.tax)
        .sum()
}

/// Splits `income` across the schedule, one entry per bracket that received income.
pub fn bracket_slices(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    let mut remaining = income;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let amount = match bracket.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };

        slices.push(BracketSlice {
            rate: bracket.rate,
            amount,
            tax: amount * bracket.rate,
        });
        remaining -= amount;
    }

    slices
}

/// Rate of the highest bracket that received income.
///
/// Falls back to the first bracket's rate for zero income, and to zero for an
/// empty schedule.
pub fn marginal_rate(
    income: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    bracket_slices(income, brackets)
        .last()
        .map(|slice| slice.rate)
        .or_else(|| brackets.first().map(|bracket| bracket.rate))
        .unwrap_or(Decimal::ZERO)
}
