use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A band of income taxed at a single marginal rate.
///
/// `max` of `None` marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub rate: Decimal,
    pub min: Decimal,
    pub max: Option<Decimal>,
}

impl TaxBracket {
    pub fn bounded(
        rate: Decimal,
        min: Decimal,
        max: Decimal,
    ) -> Self {
        Self {
            rate,
            min,
            max: Some(max),
        }
    }

    pub fn unbounded(
        rate: Decimal,
        min: Decimal,
    ) -> Self {
        Self {
            rate,
            min,
            max: None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Width of the band, or `None` for the unbounded top bracket.
    ///
    /// A bracket starting at `min` covers incomes from `min - 1` exclusive, so
    /// the width is `max - max(min - 1, 0)`.
    pub fn width(&self) -> Option<Decimal> {
        self.max
            .map(|max| max - (self.min - Decimal::ONE).max(Decimal::ZERO))
    }
}
