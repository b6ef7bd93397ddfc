//! Tax table dataset loading.
//!
//! Reads the year-keyed JSON dataset, validates every bracket schedule and
//! rate, and produces the read-only [`genie_core::TaxTables`] that the
//! calculation pipeline borrows.

mod loader;

pub use loader::{
    BUNDLED_DATASET, BracketRecord, ContributionLimitsRecord, DataFormatError, FicaRecord,
    StateRuleRecord, TaxDataset, TaxTableLoader, TaxYearRecord,
};
