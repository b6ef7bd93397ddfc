//! Tax estimation engine: federal brackets, FICA, deductions, credits,
//! capital losses, state tax and contribution savings.

pub mod calculations;
pub mod models;
pub mod validation;

pub use calculations::{
    BracketScheduleError, PotentialSavings, SavingsEstimator, TaxCalculationPipeline,
    W2ImportError,
};
pub use models::*;
pub use validation::{InputOutOfRange, validate_input};
