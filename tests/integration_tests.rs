//! Integration tests for the mbi CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd against
//! workbooks generated with rust_xlsxwriter.

use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get an mbi command isolated from the user's config and env
fn mbi(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mbi").unwrap();
    cmd.current_dir(tmp.path())
        .env("HOME", tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path().join(".config"))
        .env_remove("MBI_WORKBOOK")
        .env_remove("MBI_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a workbook with string cells; empty strings leave the cell blank
fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

fn components_sheet() -> (&'static str, Vec<Vec<&'static str>>) {
    (
        "Components",
        vec![
            vec!["Name", "Category", "SubCategory", "Status", "Mfg", "Mfg Part No", "Link"],
            vec!["servo motor", "motors", "servo", "available", "dfrobot", "a1", "https://example.com/a1"],
            vec!["motor driver", "boards", "", "backorder", "sparkfun", "a2", ""],
            vec!["ultrasonic sensor", "sensors", "distance", "Available", "seeed", "a3", ""],
        ],
    )
}

/// Helper to create the full three-sheet workbook in a temp directory
fn setup_workbook() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("parts.xlsx");
    write_workbook(
        &path,
        &[
            components_sheet(),
            (
                "Set Delivery",
                vec![
                    vec!["Set No", "Final Status", "Name", "Link"],
                    vec!["Set 10", "released", "servo motor", "https://example.com/s10"],
                    vec!["Set 2", "backorder", "motor driver", "https://example.com/s2"],
                    vec!["Set 1", "released", "ultrasonic sensor", ""],
                    vec!["Set 2", "split", "servo motor", ""],
                ],
            ),
            (
                "Projects Considered",
                vec![
                    vec!["Project", "Component 1", "Component 2", "Component 3"],
                    vec!["robot arm", "a1", "a2", "missing"],
                    vec!["rover", "a3", "", ""],
                ],
            ),
        ],
    );
    (tmp, path)
}

/// Workbook with only the components sheet
fn setup_components_only() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("parts.xlsx");
    write_workbook(&path, &[components_sheet()]);
    (tmp, path)
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory"))
        .stdout(predicate::str::contains("delivery"))
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mbi"));
}

#[test]
fn test_missing_workbook_fails() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .args(["inventory", "--file", "nope.xlsx"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_corrupt_workbook_reports_load_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.xlsx"), b"not a spreadsheet").unwrap();
    mbi(&tmp)
        .args(["status", "--file", "broken.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("data load error"));
}

#[test]
fn test_default_workbook_name() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .arg("inventory")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mechatronics Project Parts_Data.xlsx"));
}

// ============================================================================
// Inventory Tests
// ============================================================================

#[test]
fn test_inventory_dashboard() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("inventory")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Parts:   3"))
        .stdout(predicate::str::contains("Available:     2 (66%)"))
        .stdout(predicate::str::contains("TOP MANUFACTURERS"))
        .stdout(predicate::str::contains("Seeed Studio"));
}

#[test]
fn test_inventory_json_cleaned_values() {
    let (tmp, path) = setup_workbook();
    let json = json_output(mbi(&tmp).arg("inventory").arg("--file").arg(&path).args(["-f", "json"]));

    assert_eq!(json["kpis"]["total_parts"], 3);
    assert_eq!(json["kpis"]["availability_pct"], 66);
    assert_eq!(json["kpis"]["manufacturers"], 3);
    assert_eq!(json["status_options"], serde_json::json!(["Available", "Backorder"]));

    let brands: Vec<&str> = json["top_manufacturers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert!(brands.contains(&"DFRobot"));
    assert!(brands.contains(&"SparkFun"));
    // rows only with --list
    assert!(json.get("rows").is_none());
}

#[test]
fn test_inventory_search_single_row() {
    let (tmp, path) = setup_workbook();
    let json = json_output(
        mbi(&tmp)
            .arg("inventory")
            .arg("--file")
            .arg(&path)
            .args(["--search", "ULTRASONIC", "--list", "-f", "json"]),
    );
    assert_eq!(json["kpis"]["total_parts"], 1);
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Name"], "Ultrasonic Sensor");
    assert_eq!(rows[0]["Mfg"], "Seeed Studio");
}

#[test]
fn test_inventory_status_filter_case_insensitive() {
    let (tmp, path) = setup_workbook();
    let json = json_output(
        mbi(&tmp)
            .arg("inventory")
            .arg("--file")
            .arg(&path)
            .args(["--status", "backorder", "-f", "json"]),
    );
    assert_eq!(json["kpis"]["total_parts"], 1);
    assert_eq!(json["kpis"]["availability_pct"], 0);
}

#[test]
fn test_inventory_placeholder_becomes_unknown() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("inventory")
        .arg("--file")
        .arg(&path)
        .args(["--search", "driver", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Name,Category,SubCategory,Status,Mfg,Mfg Part No,Link",
        ))
        .stdout(predicate::str::contains("Motor Driver,Boards,Unknown,Backorder,SparkFun,A2,"));
}

// ============================================================================
// Delivery Tests
// ============================================================================

#[test]
fn test_delivery_natural_set_order() {
    let (tmp, path) = setup_workbook();
    let json = json_output(mbi(&tmp).arg("delivery").arg("--file").arg(&path).args(["-f", "json"]));

    assert_eq!(json["set_options"], serde_json::json!(["Set 1", "Set 2", "Set 10"]));
    assert_eq!(json["kpis"]["items"], 4);
    assert_eq!(json["kpis"]["released"], 2);
    assert_eq!(json["kpis"]["released_pct"], 50);
    assert_eq!(json["exceptions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_delivery_dashboard() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("delivery")
        .arg("--file")
        .arg(&path)
        .args(["--set", "set 2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Items:      2"))
        .stdout(predicate::str::contains("EXCEPTIONS"))
        .stdout(predicate::str::contains("Backorder"));
}

#[test]
fn test_delivery_missing_sheet() {
    let (tmp, path) = setup_components_only();
    mbi(&tmp)
        .arg("delivery")
        .arg("--file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Delivery data missing"));
}

// ============================================================================
// Projects Tests
// ============================================================================

#[test]
fn test_projects_readiness() {
    let (tmp, path) = setup_workbook();
    let json = json_output(mbi(&tmp).arg("projects").arg("--file").arg(&path).args(["-f", "json"]));

    let boms = json["boms"].as_array().unwrap();
    assert_eq!(boms.len(), 2);
    assert_eq!(boms[0]["project"], "Robot Arm");
    assert_eq!(boms[0]["total_parts"], 3);
    assert_eq!(boms[0]["in_stock"], 1);
    assert_eq!(boms[0]["readiness_pct"], 33);
    assert_eq!(boms[1]["readiness_pct"], 100);
    assert_eq!(json["kpis"]["fully_ready"], 1);
}

#[test]
fn test_projects_single_project_detail() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("projects")
        .arg("--file")
        .arg(&path)
        .args(["--project", "robot arm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BOM DETAIL: Robot Arm"))
        .stdout(predicate::str::contains("Not In Inventory"));
}

#[test]
fn test_projects_missing_sheet() {
    let (tmp, path) = setup_components_only();
    mbi(&tmp)
        .arg("projects")
        .arg("--file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Projects data missing"));
}

// ============================================================================
// Status / Sheets Tests
// ============================================================================

#[test]
fn test_status_shows_missing_pages_inline() {
    let (tmp, path) = setup_components_only();
    mbi(&tmp)
        .arg("status")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("INVENTORY"))
        .stdout(predicate::str::contains("Delivery data missing"))
        .stdout(predicate::str::contains("Projects data missing"));
}

#[test]
fn test_status_json() {
    let (tmp, path) = setup_workbook();
    let json = json_output(mbi(&tmp).arg("status").arg("--file").arg(&path).args(["-f", "json"]));
    assert_eq!(json["inventory"]["kpis"]["total_parts"], 3);
    assert_eq!(json["delivery"]["kpis"]["items"], 4);
    assert_eq!(json["projects"]["kpis"]["projects"], 2);
}

#[test]
fn test_sheets_diagnostics() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("sheets")
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set Delivery"))
        .stdout(predicate::str::contains("Projects Considered"))
        .stdout(predicate::str::contains("Mfg Part No"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_local_config_workbook_and_synonyms() {
    let (tmp, _path) = setup_workbook();
    fs::write(
        tmp.path().join(".mbi.yaml"),
        "workbook: parts.xlsx\nbrand_synonyms:\n  Sparkfun: SparkFun Electronics\n",
    )
    .unwrap();

    let json = json_output(mbi(&tmp).args(["inventory", "-f", "json"]));
    let brands: Vec<&str> = json["top_manufacturers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert!(brands.contains(&"SparkFun Electronics"));
}

#[test]
fn test_env_format_default() {
    let (tmp, path) = setup_workbook();
    let mut cmd = mbi(&tmp);
    cmd.env("MBI_FORMAT", "json").arg("delivery").arg("--file").arg(&path);
    let json = json_output(&mut cmd);
    assert_eq!(json["kpis"]["items"], 4);
}

#[test]
fn test_column_override_from_config() {
    let tmp = TempDir::new().unwrap();
    write_workbook(
        &tmp.path().join("parts.xlsx"),
        &[(
            "Components",
            vec![
                vec!["Name", "State"],
                vec!["servo", "available"],
                vec!["stepper", "backorder"],
            ],
        )],
    );
    fs::write(
        tmp.path().join(".mbi.yaml"),
        "workbook: parts.xlsx\ncolumns:\n  status: [State]\n",
    )
    .unwrap();

    let json = json_output(mbi(&tmp).args(["inventory", "-f", "json"]));
    assert_eq!(json["kpis"]["available"], 1);
    assert_eq!(json["columns"]["status"], "State");
}

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brand_synonyms"))
        .stdout(predicate::str::contains("part_number"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    mbi(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mbi"));
}

#[test]
fn test_dashboard_requires_terminal() {
    let (tmp, path) = setup_workbook();
    mbi(&tmp)
        .arg("dashboard")
        .arg("--file")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}
