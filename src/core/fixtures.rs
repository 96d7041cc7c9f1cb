//! Workbook fixtures for unit tests

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

/// Write a workbook with string cells; empty strings leave the cell blank
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<&str>>)]) {
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

/// A small parts workbook with all three logical sheets
pub fn sample_workbook(path: &Path) {
    write_workbook(
        path,
        &[
            (
                "Components",
                vec![
                    vec!["Name", "Category", "SubCategory", "Status", "Mfg", "Mfg Part No", "Link"],
                    vec!["servo motor", "motors", "servo", "available", "dfrobot", "a1", "https://x/a1"],
                    vec!["motor driver", "boards", "", "backorder", "sparkfun", "a2", ""],
                    vec!["ultrasonic sensor", "sensors", "distance", "Available", "seeed", "a3", ""],
                ],
            ),
            (
                "Set Delivery",
                vec![
                    vec!["Set No", "Final Status", "Name", "Link"],
                    vec!["Set 10", "released", "servo motor", "https://x/s10"],
                    vec!["Set 2", "backorder", "motor driver", "https://x/s2"],
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
}

/// Components sheet with a date-formatted `Received` column
pub fn workbook_with_dates(path: &Path) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Components").unwrap();
    worksheet.write_string(0, 0, "Name").unwrap();
    worksheet.write_string(0, 1, "Received").unwrap();
    worksheet.write_string(1, 0, "servo motor").unwrap();
    worksheet.write_string(2, 0, "motor driver").unwrap();

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let received = ExcelDateTime::from_ymd(2024, 1, 5).unwrap();
    worksheet
        .write_datetime_with_format(1, 1, &received, &date_format)
        .unwrap();
    workbook.save(path).unwrap();
}
