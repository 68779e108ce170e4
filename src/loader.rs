use crate::types::{Field, JobSeeker};
use crate::util::parse_date_safe;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// The export wraps its record array under a top-level `"in"` key.
#[derive(Debug, Deserialize)]
struct Export {
    #[serde(rename = "in")]
    records: Vec<JobSeeker>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON export: {0}")]
    Json(#[from] serde_json::Error),
}

/// Diagnostics gathered while loading, printed to the console afterwards.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub caseload_rows: usize,
    pub managing_sites: usize,
    /// Non-empty WE12_END_DATE values that failed to parse. These records
    /// still load and simply never count as expired; the number is surfaced
    /// here as a data-quality note.
    pub unparsed_we12_dates: usize,
}

/// Load the JSON export. A missing file, invalid JSON, or a missing `"in"`
/// wrapper key is fatal for the load step; once this returns `Ok`, the rest
/// of the program can assume a fully-parsed record sequence.
pub fn load(path: &str) -> Result<(Vec<JobSeeker>, LoadReport), LoadError> {
    let raw = std::fs::read_to_string(Path::new(path)).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    let export: Export = serde_json::from_str(&raw)?;
    let records = export.records;

    let caseload_rows = records
        .iter()
        .filter(|r| matches!(r.field(Field::Status), "COM" | "PND" | "SUS"))
        .count();
    let managing_sites: HashSet<&str> = records
        .iter()
        .map(|r| r.managed_by.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    let unparsed_we12_dates = records
        .iter()
        .filter(|r| {
            !r.we12_end_date.trim().is_empty()
                && parse_date_safe(Some(r.we12_end_date.as_str())).is_none()
        })
        .count();

    let report = LoadReport {
        total_rows: records.len(),
        caseload_rows,
        managing_sites: managing_sites.len(),
        unparsed_we12_dates,
    };
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_wrapped_record_array() {
        let json = r#"{"in": [
            {"JOB_SEEKER_ID": 10, "FIRST_GIVEN_NAME": "Ava", "FAMILY_NAME": "Ngo",
             "STATUS": "COM", "MANAGED_BY": "FHTGKL52", "WE12_END_DATE": "2024-01-05",
             "EXTRA_COLUMN_WE_NEVER_READ": "ignored"},
            {"JOB_SEEKER_ID": 11, "STATUS": "EXT", "WE12_END_DATE": "junk"}
        ]}"#;
        let export: Export = serde_json::from_str(json).unwrap();
        assert_eq!(export.records.len(), 2);
        assert_eq!(export.records[0].first_given_name, "Ava");
        // Absent fields default to empty strings.
        assert_eq!(export.records[1].family_name, "");
    }

    #[test]
    fn missing_wrapper_key_is_an_error() {
        let parsed: Result<Export, _> = serde_json::from_str(r#"{"out": []}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn load_reports_counts_and_data_quality() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SUB216.json");
        std::fs::write(
            &path,
            r#"{"in": [
                {"JOB_SEEKER_ID": 1, "STATUS": "COM", "MANAGED_BY": "FHTGKL52",
                 "WE12_END_DATE": "2024-01-05"},
                {"JOB_SEEKER_ID": 2, "STATUS": "PND", "MANAGED_BY": "VXJFZS75",
                 "WE12_END_DATE": "junk"},
                {"JOB_SEEKER_ID": 3, "STATUS": "EXT", "MANAGED_BY": "VXJFZS75"}
            ]}"#,
        )
        .unwrap();

        let (records, report) = load(path.to_str().unwrap()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.caseload_rows, 2);
        assert_eq!(report.managing_sites, 2);
        assert_eq!(report.unparsed_we12_dates, 1);
    }

    #[test]
    fn missing_file_is_an_io_error_with_path_context() {
        let err = load("does_not_exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("does_not_exist.json"));
    }
}
