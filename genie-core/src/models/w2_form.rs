use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Box 12 codes the importer understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Box12Code {
    /// D, E, F, G or S: elective deferrals to a 401(k)-style plan.
    ElectiveDeferral(String),

    /// W: employer and employee HSA contributions.
    HealthSavingsAccount,

    /// Any other code; carried along but not used.
    Other(String),
}

impl Box12Code {
    pub fn parse(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        match code.as_str() {
            "D" | "E" | "F" | "G" | "S" => Self::ElectiveDeferral(code),
            "W" => Self::HealthSavingsAccount,
            _ => Self::Other(code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Box12Entry {
    pub code: Box12Code,
    pub amount: Decimal,
}

/// The boxes of a Form W-2 that feed a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct W2Form {
    /// Box 1: wages, tips, other compensation.
    pub wages: Decimal,
    /// Box 2: federal income tax withheld.
    pub federal_withheld: Decimal,
    /// Box 3
    pub social_security_wages: Decimal,
    /// Box 4
    pub social_security_withheld: Decimal,
    /// Box 5
    pub medicare_wages: Decimal,
    /// Box 6
    pub medicare_withheld: Decimal,
    pub box12: Option<Box12Entry>,
    /// Box 17: state income tax withheld.
    pub state_withheld: Decimal,
}

impl W2Form {
    /// Box 12 amount that counts as a 401(k) deferral.
    pub fn elective_deferral(&self) -> Decimal {
        match &self.box12 {
            Some(Box12Entry {
                code: Box12Code::ElectiveDeferral(_),
                amount,
            }) if *amount > Decimal::ZERO => *amount,
            _ => Decimal::ZERO,
        }
    }

    /// Box 12 amount that counts as an HSA contribution.
    pub fn hsa_contribution(&self) -> Decimal {
        match &self.box12 {
            Some(Box12Entry {
                code: Box12Code::HealthSavingsAccount,
                amount,
            }) if *amount > Decimal::ZERO => *amount,
            _ => Decimal::ZERO,
        }
    }
}
