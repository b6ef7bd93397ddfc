mod contribution_limits;
mod fica_rates;
mod filing_status;
mod state_tax_rule;
mod tax_bracket;
mod tax_input;
mod tax_result;
mod tax_tables;
mod tax_year_table;
mod w2_form;

pub use contribution_limits::ContributionLimits;
pub use fica_rates::FicaRates;
pub use filing_status::{FilingStatus, PerFilingStatus, UnknownFilingStatus};
pub use state_tax_rule::StateTaxRule;
pub use tax_bracket::TaxBracket;
pub use tax_input::{DeductionMethod, ItemizedDeductions, TaxInput, Withholding};
pub use tax_result::{DeductionType, FicaTaxes, TaxResult};
pub use tax_tables::TaxTables;
pub use tax_year_table::TaxYearTable;
pub use w2_form::{Box12Code, Box12Entry, W2Form};
