//! Integration tests that exercise the loaders against on-disk fixture files.
//!
//! These complement the unit tests inside csv_loader.rs (which all use
//! inline string literals) by verifying that the full read-from-disk path
//! works end-to-end.

use std::path::{Path, PathBuf};

use genie_cli::csv_loader::{self, CsvLoadError};
use genie_core::models::{DeductionMethod, FilingStatus};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_scenario_fixture_succeeds() {
    let scenarios = csv_loader::load_scenarios_from_file(&fixture_path("scenarios.csv"))
        .expect("fixture file should load without error");

    assert_eq!(scenarios.len(), 5);
    let names: Vec<&str> = scenarios.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Single in California",
            "Two earners saving",
            "Separate with losses",
            "High earner",
            "Itemizing family",
        ]
    );
}

#[test]
fn test_load_scenario_fixture_statuses() {
    let scenarios =
        csv_loader::load_scenarios_from_file(&fixture_path("scenarios.csv")).expect("load");
    let statuses: Vec<FilingStatus> = scenarios.iter().map(|s| s.input.filing_status).collect();

    assert_eq!(
        statuses,
        vec![
            FilingStatus::Single,
            FilingStatus::MarriedJointly,
            FilingStatus::MarriedSeparately,
            FilingStatus::Single,
            FilingStatus::MarriedJointly,
        ]
    );
}

#[test]
fn test_load_scenario_fixture_itemizing_row() {
    let scenarios =
        csv_loader::load_scenarios_from_file(&fixture_path("scenarios.csv")).expect("load");
    let input = &scenarios[4].input;

    assert_eq!(input.primary_wages, dec!(150000));
    assert_eq!(input.contribution_401k, dec!(5000));
    assert_eq!(input.contribution_hsa, dec!(2000));
    assert_eq!(input.dependents, 2);
    assert_eq!(input.deduction_method, DeductionMethod::Itemized);
    assert_eq!(input.itemized.property_taxes, dec!(10000));
    assert_eq!(input.withholding.total(), dec!(32475));
}

#[test]
fn test_load_w2_fixture() {
    let forms = csv_loader::load_w2_from_file(&fixture_path("w2_couple.csv")).expect("load");

    assert_eq!(forms.len(), 2);
    assert_eq!(forms[0].elective_deferral(), dec!(20000));
    assert_eq!(forms[0].social_security_wages, dec!(110000));
    assert_eq!(forms[1].hsa_contribution(), dec!(4000));
    assert_eq!(forms[1].state_withheld, dec!(3200));
}

#[test]
fn test_load_missing_file_reports_path() {
    let err = csv_loader::load_scenarios_from_file(&fixture_path("does_not_exist.csv"))
        .expect_err("should fail");

    assert!(matches!(err, CsvLoadError::Io { .. }));
    assert!(err.to_string().contains("does_not_exist.csv"));
}
