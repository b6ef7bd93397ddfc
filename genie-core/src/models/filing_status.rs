use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Filing status governing which bracket, deduction and threshold table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    HeadOfHousehold,
    MarriedJointly,
    MarriedSeparately,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised filing status '{0}'")]
pub struct UnknownFilingStatus(pub String);

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        Self::Single,
        Self::HeadOfHousehold,
        Self::MarriedJointly,
        Self::MarriedSeparately,
    ];

    /// Dataset key for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::HeadOfHousehold => "head_of_household",
            Self::MarriedJointly => "married_jointly",
            Self::MarriedSeparately => "married_separately",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::HeadOfHousehold => "Head of Household",
            Self::MarriedJointly => "Married Filing Jointly",
            Self::MarriedSeparately => "Married Filing Separately",
        }
    }

    /// Accepts dataset keys as well as the short IRS codes (`S`, `HOH`, `MFJ`, `MFS`),
    /// in any case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "s" => Some(Self::Single),
            "head_of_household" | "hoh" => Some(Self::HeadOfHousehold),
            "married_jointly" | "mfj" => Some(Self::MarriedJointly),
            "married_separately" | "mfs" => Some(Self::MarriedSeparately),
            _ => None,
        }
    }

    /// Married statuses expect a second earner (possibly with zero wages).
    pub fn is_married(&self) -> bool {
        matches!(self, Self::MarriedJointly | Self::MarriedSeparately)
    }
}

impl FromStr for FilingStatus {
    type Err = UnknownFilingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownFilingStatus(s.to_string()))
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per filing status.
///
/// Field names match the dataset keys, so a table missing any status fails
/// to deserialize instead of producing a partial lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerFilingStatus<T> {
    pub single: T,
    pub head_of_household: T,
    pub married_jointly: T,
    pub married_separately: T,
}

impl<T> PerFilingStatus<T> {
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
            FilingStatus::MarriedJointly => &self.married_jointly,
            FilingStatus::MarriedSeparately => &self.married_separately,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        FilingStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }

    /// Converts every value, stopping at the first failure.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(FilingStatus, &T) -> Result<U, E>,
    ) -> Result<PerFilingStatus<U>, E> {
        Ok(PerFilingStatus {
            single: f(FilingStatus::Single, &self.single)?,
            head_of_household: f(FilingStatus::HeadOfHousehold, &self.head_of_household)?,
            married_jointly: f(FilingStatus::MarriedJointly, &self.married_jointly)?,
            married_separately: f(FilingStatus::MarriedSeparately, &self.married_separately)?,
        })
    }
}
