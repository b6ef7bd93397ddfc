//! Text and JSON rendering of estimates.

use std::fmt;

use genie_core::calculations::{bracket_slices, marginal_rate};
use genie_core::models::TaxTables;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::app::Estimate;
use crate::utils::{format_currency, format_percent};

/// A printable explanation of one [`Estimate`].
///
/// Borrowing the tables lets the report show how taxable income spread
/// across the federal brackets.
pub struct EstimateReport<'a> {
    estimate: &'a Estimate,
    tables: &'a TaxTables,
}

impl<'a> EstimateReport<'a> {
    pub fn new(
        estimate: &'a Estimate,
        tables: &'a TaxTables,
    ) -> Self {
        Self { estimate, tables }
    }
}

fn line(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    value: String,
) -> fmt::Result {
    writeln!(f, "  {label:<40}{value:>16}")
}

fn minus(amount: Decimal) -> String {
    format!("- {}", format_currency(amount))
}

impl fmt::Display for EstimateReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = &self.estimate.result;
        let savings = &self.estimate.potential_savings;

        match &self.estimate.name {
            Some(name) => writeln!(f, "{name}")?,
            None => writeln!(f, "Tax estimate")?,
        }
        writeln!(
            f,
            "  {} tax year, {}, {}",
            result.tax_year, result.filing_status, result.state
        )?;
        writeln!(f)?;

        // Income and deductions
        line(f, "Gross income", format_currency(result.gross_income))?;
        if !result.contribution_401k.is_zero() {
            line(f, "401(k) contributions", minus(result.contribution_401k))?;
        }
        if !result.contribution_hsa.is_zero() {
            line(f, "HSA contributions", minus(result.contribution_hsa))?;
        }
        if !result.capital_loss_deduction.is_zero() {
            line(f, "Capital loss deduction", minus(result.capital_loss_deduction))?;
        }
        line(f, "Adjusted gross income", format_currency(result.adjusted_gross_income))?;
        if result.used_itemized_deduction() {
            line(f, "Itemized deduction", minus(result.deduction))?;
            if !result.deductible_medical_expenses.is_zero() {
                line(
                    f,
                    "  incl. medical above 7.5% of AGI",
                    format_currency(result.deductible_medical_expenses),
                )?;
            }
        } else {
            line(f, "Standard deduction", minus(result.deduction))?;
            if !result.itemized_total.is_zero() {
                line(
                    f,
                    "  (itemized total was lower)",
                    format_currency(result.itemized_total),
                )?;
            }
        }
        line(f, "Taxable income", format_currency(result.taxable_income))?;
        writeln!(f)?;

        // Federal brackets
        let brackets = self.tables.year_table.brackets(result.filing_status);
        for slice in bracket_slices(result.taxable_income, brackets) {
            line(
                f,
                &format!(
                    "  {} on {}",
                    format_percent(slice.rate),
                    format_currency(slice.amount)
                ),
                format_currency(slice.tax),
            )?;
        }
        line(
            f,
            "Federal tax before credits",
            format_currency(result.federal_tax_before_credits),
        )?;
        if !result.child_credit_applied.is_zero() {
            let children = if result.dependents == 1 {
                "child"
            } else {
                "children"
            };
            line(
                f,
                &format!("Child tax credit ({} {children})", result.dependents),
                minus(result.child_credit_applied),
            )?;
        }
        line(f, "Federal income tax", format_currency(result.federal_tax))?;
        line(
            f,
            &format!("State income tax ({})", result.state),
            format_currency(result.state_tax),
        )?;
        line(f, "FICA taxes (employee share)", format_currency(result.total_fica_tax))?;
        line(f, "  Social Security", format_currency(result.fica.social_security))?;
        line(f, "  Medicare", format_currency(result.fica.medicare))?;
        if !result.fica.additional_medicare.is_zero() {
            line(
                f,
                "  Additional Medicare",
                format_currency(result.fica.additional_medicare),
            )?;
        }
        line(f, "Total tax owed", format_currency(result.total_tax_owed))?;
        writeln!(f)?;

        // Reconciliation
        line(f, "Total withheld", format_currency(result.total_withheld))?;
        if result.is_refund() {
            line(f, "Estimated refund", format_currency(result.refund_or_owed))?;
        } else {
            line(f, "Estimated amount owed", format_currency(-result.refund_or_owed))?;
        }
        line(f, "Effective rate", format_percent(result.effective_rate))?;
        line(
            f,
            "Effective rate incl. FICA",
            format_percent(result.effective_rate_with_fica),
        )?;
        line(
            f,
            "Marginal federal rate",
            format_percent(marginal_rate(result.taxable_income, brackets)),
        )?;

        if !result.contribution_tax_savings.is_zero() {
            line(
                f,
                "Tax saved by pre-tax contributions",
                format_currency(result.contribution_tax_savings),
            )?;
        }
        if !result.capital_loss_carryforward.is_zero() {
            line(
                f,
                "Capital loss carryforward",
                format_currency(result.capital_loss_carryforward),
            )?;
        }

        // Genie tips
        if savings.has_savings() {
            writeln!(f)?;
            writeln!(f, "  Genie tips")?;
            if !savings.contribution_401k.is_zero() {
                writeln!(
                    f,
                    "  * Max out your 401(k) contribution: save an additional {} in taxes",
                    format_currency(savings.contribution_401k)
                )?;
            }
            if !savings.contribution_hsa.is_zero() {
                writeln!(
                    f,
                    "  * Max out your HSA contribution: save an additional {} in taxes",
                    format_currency(savings.contribution_hsa)
                )?;
            }
            line(f, "Total potential savings", format_currency(savings.total))?;
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    estimates: &'a [Estimate],
}

/// Renders estimates as pretty-printed JSON.
///
/// Amounts are emitted as decimal strings at full precision.
pub fn to_json(estimates: &[Estimate]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport { estimates })
}
