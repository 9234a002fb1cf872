pub mod aggregate;
pub mod types;

pub use aggregate::aggregate;
pub use types::{ReportRow, RowIndex, RunResult, RunStats, SpecResult, TestEntry, TABLE_HEADERS};

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::Path;

/// Load a run result from a JSON file
pub fn load_results(results_path: &Path) -> Result<RunResult> {
    let raw = std::fs::read_to_string(results_path)
        .with_context(|| format!("Failed to read results: {}", results_path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", results_path.display()))?;
    Ok(RunResult::from_value(value))
}

/// Render rows as CSV with the table headers
pub fn rows_to_csv(rows: &[ReportRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Render rows as a bordered text table
pub fn rows_to_table(rows: &[ReportRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(TABLE_HEADERS);

    for row in rows {
        table.add_row(row.cells());
    }

    table.to_string()
}

/// Render rows in the requested format (json, csv, table)
pub fn export_rows(rows: &[ReportRow], format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(rows)?),
        "csv" => rows_to_csv(rows),
        "table" => Ok(rows_to_table(rows)),
        _ => anyhow::bail!("Unknown format: {}", format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_rows() -> Vec<ReportRow> {
        aggregate(&RunResult::from_value(json!({
            "stats": {"tests": 3, "passes": 2, "failures": 1, "skipped": 0},
            "specs": [{"file": "a/login.spec.js", "total": 3, "passes": 2, "failures": 1, "skipped": 0}]
        })))
    }

    #[test]
    fn test_load_results() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stats": {{"tests": 1}}, "specs": []}}"#).unwrap();

        let result = load_results(file.path()).unwrap();
        assert_eq!(result.stats.unwrap().tests, Some(1));
        assert_eq!(result.specs.unwrap().len(), 0);
    }

    #[test]
    fn test_load_results_rejects_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_results(file.path()).is_err());
    }

    #[test]
    fn test_rows_to_csv() {
        let csv = rows_to_csv(&sample_rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Sl No,Spec File Name,Total TC,Total Passed TC,Total Failed TC,Total Skipped TC"
        );
        assert_eq!(lines[1], "1,login,3,2,1,0");
        assert_eq!(lines[2], "--,Total,3,2,1,0");
    }

    #[test]
    fn test_rows_to_table() {
        let table = rows_to_table(&sample_rows());

        let header = table.lines().find(|l| l.contains("Sl No")).unwrap();
        for name in TABLE_HEADERS {
            assert!(header.contains(name));
        }

        let login = table.lines().find(|l| l.contains("login")).unwrap();
        assert!(login.starts_with('│'));
        assert!(login.contains(" 1 "));
        assert!(login.contains(" 3 "));

        let total = table.lines().find(|l| l.contains(" -- ")).unwrap();
        assert!(total.contains("Total"));
        assert!(!total.contains("Sl No"));
        assert!(table.find("login").unwrap() < table.find(" -- ").unwrap());
    }

    #[test]
    fn test_export_rows() {
        let rows = sample_rows();
        assert_eq!(export_rows(&rows, "table").unwrap(), rows_to_table(&rows));
        assert_eq!(export_rows(&rows, "csv").unwrap(), rows_to_csv(&rows).unwrap());

        let json: serde_json::Value =
            serde_json::from_str(&export_rows(&rows, "json").unwrap()).unwrap();
        assert_eq!(json[1]["Sl No"], serde_json::json!("--"));

        assert!(export_rows(&rows, "xml").is_err());
    }
}
