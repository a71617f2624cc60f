//! Configuration validation module

use crate::config::{AnalysisConfig, GithubConfig, LoggingConfig, OutputConfig};

/// Trait for validating configuration sections
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("GitHub configuration error: {message}")]
    Github { message: String },

    #[error("Analysis configuration error: {message}")]
    Analysis { message: String },

    #[error("Output configuration error: {message}")]
    Output { message: String },

    #[error("Logging configuration error: {message}")]
    Logging { message: String },
}

impl ValidationError {
    pub fn github(message: impl Into<String>) -> Self {
        Self::Github {
            message: message.into(),
        }
    }

    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

impl Validate for GithubConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::github("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::github(
                "base_url must be an http(s) URL",
            ));
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ValidationError::github("page_size must be in 1..=100"));
        }
        if self.timeout_seconds == 0 {
            return Err(ValidationError::github("timeout_seconds must be > 0"));
        }
        if self.max_repositories == 0 {
            return Err(ValidationError::github("max_repositories must be > 0"));
        }
        Ok(())
    }
}

impl Validate for AnalysisConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_repositories == 0 {
            return Err(ValidationError::analysis(
                "max_concurrent_repositories must be > 0",
            ));
        }
        if self.fetch_timeout_seconds == 0 {
            return Err(ValidationError::analysis(
                "fetch_timeout_seconds must be > 0",
            ));
        }
        if self.max_scan_bytes == 0 {
            return Err(ValidationError::analysis("max_scan_bytes must be > 0"));
        }
        if self.max_matches_per_pattern == 0 {
            return Err(ValidationError::analysis(
                "max_matches_per_pattern must be > 0",
            ));
        }
        if self.max_files_scanned == 0 {
            return Err(ValidationError::analysis("max_files_scanned must be > 0"));
        }
        if self.max_single_file_bytes == 0 {
            return Err(ValidationError::analysis(
                "max_single_file_bytes must be > 0",
            ));
        }
        Ok(())
    }
}

impl Validate for OutputConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ValidationError::output("path must not be empty"));
        }
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.format.as_str() {
            "json" | "pretty" | "compact" => Ok(()),
            other => Err(ValidationError::logging(format!(
                "unknown log format '{}' (expected json, pretty, or compact)",
                other
            ))),
        }
    }
}
