//! Application Layer error types

use crate::infrastructure::repository_source::RepositorySourceError;

/// Errors raised while analyzing a single repository
///
/// Only `RepositoryUnavailable` excludes a repository from the output; the
/// other variants degrade to skipped signals or dropped rule candidates and
/// are surfaced as warnings.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Repository {repository} unavailable: {source}")]
    RepositoryUnavailable {
        repository: String,
        #[source]
        source: RepositorySourceError,
    },

    #[error("Failed to parse manifest {file}: {message}")]
    ManifestParse { file: String, message: String },

    #[error("Rule '{rule}' evaluation failed: {message}")]
    PatternEvaluation { rule: String, message: String },
}

/// Errors raised while writing the report artifact
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
