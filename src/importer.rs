//! Header validation for behaviour-data uploads.
//!
//! Only the header row is inspected. Imported rows are not fed into the
//! task engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::ReachaiError;

pub const REQUIRED_FIELDS: &[&str] = &["user_id", "event_type", "timestamp"];
pub const OPTIONAL_FIELDS: &[&str] = &["item_id", "category_id", "amount", "channel"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub headers: Vec<String>,
    pub missing: Vec<String>,
    pub optional_present: Vec<String>,
}

impl HeaderReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }
}

/// CSV template: every known field on one header line.
pub fn template() -> String {
    let fields: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter())
        .copied()
        .collect();
    format!("{}\n", fields.join(","))
}

pub fn read_header_row(reader: impl Read) -> Result<Vec<String>, ReachaiError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut record = csv::StringRecord::new();
    if !rdr.read_record(&mut record)? {
        return Err(ReachaiError::validation("File is empty"));
    }
    let headers: Vec<String> = record
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().trim_matches('"').to_string())
        .filter(|h| !h.is_empty())
        .collect();
    Ok(headers)
}

pub fn check_headers(headers: &[String]) -> HeaderReport {
    let has = |field: &str| headers.iter().any(|h| h == field);
    HeaderReport {
        headers: headers.to_vec(),
        missing: REQUIRED_FIELDS
            .iter()
            .filter(|f| !has(**f))
            .map(|f| f.to_string())
            .collect(),
        optional_present: OPTIONAL_FIELDS
            .iter()
            .filter(|f| has(**f))
            .map(|f| f.to_string())
            .collect(),
    }
}

/// Inspect an uploaded file. Only `.csv` is accepted.
pub fn inspect_file(path: &Path) -> Result<HeaderReport, ReachaiError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("csv") => {}
        Some("xlsx") | Some("xls") => {
            return Err(ReachaiError::validation(
                "Spreadsheet import is not supported; save the sheet as CSV",
            ))
        }
        _ => return Err(ReachaiError::validation("Upload a CSV file")),
    }
    let file = File::open(path)?;
    let headers = read_header_row(file)?;
    let report = check_headers(&headers);
    debug!(path = %path.display(), missing = report.missing.len(), "checked import headers");
    Ok(report)
}
