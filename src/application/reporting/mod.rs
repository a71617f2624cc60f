//! Report generation
//!
//! Serializes the ordered per-repository results into the JSON artifact.

pub mod models;

use std::path::Path;

use tracing::info;

use crate::application::errors::ReportError;
use crate::domain::DetectionResult;
use models::RepositoryAnalysisRecord;

/// Build the report records in result order.
pub fn build_report(results: &[DetectionResult]) -> Vec<RepositoryAnalysisRecord> {
    results.iter().map(Into::into).collect()
}

/// Serialize results to the JSON report body.
pub fn generate_json_report(
    results: &[DetectionResult],
    pretty: bool,
) -> Result<String, ReportError> {
    let records = build_report(results);
    let body = if pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    Ok(body)
}

/// Write the report artifact. Failure here is the one fatal error of a run.
pub fn write_report(
    path: &Path,
    results: &[DetectionResult],
    pretty: bool,
) -> Result<(), ReportError> {
    let body = generate_json_report(results, pretty)?;
    std::fs::write(path, body)?;
    info!(path = %path.display(), repositories = results.len(), "Report written");
    Ok(())
}
