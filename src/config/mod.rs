//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// GitHub API access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub base_url: String,
    /// Personal access token; unauthenticated requests see public data only
    pub token: Option<String>,
    /// Owner (user or organization) whose repositories are inventoried
    pub owner: Option<String>,
    pub timeout_seconds: u64,
    /// Repositories fetched per page (GitHub caps this at 100)
    pub page_size: u32,
    /// Hard cap on repositories pulled from the listing
    pub max_repositories: usize,
    pub max_concurrent_file_fetches: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            owner: None,
            timeout_seconds: 30,
            page_size: 100,
            max_repositories: 100,
            max_concurrent_file_fetches: 8,
        }
    }
}

/// Detection and scan bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Worker pool size for per-repository analysis
    pub max_concurrent_repositories: usize,
    /// Per-repository file tree fetch timeout; expiry counts as a fetch failure
    pub fetch_timeout_seconds: u64,
    /// Upper bound on text content scanned for patterns, per repository
    pub max_scan_bytes: u64,
    /// Distinct matches kept per text pattern
    pub max_matches_per_pattern: usize,
    /// Upper bound on files pulled from one repository tree
    pub max_files_scanned: usize,
    /// Files larger than this are not fetched for text scanning
    pub max_single_file_bytes: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent_repositories: 4,
            fetch_timeout_seconds: 60,
            max_scan_bytes: 1_048_576,
            max_matches_per_pattern: 20,
            max_files_scanned: 200,
            max_single_file_bytes: 262_144,
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("analysis_results.json"),
            pretty: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.github.validate()?;
        self.analysis.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        // Add local config and environment variables last (highest priority)
        builder = builder
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("REPOLENS").separator("__"));

        let mut config: Config = builder.build()?.try_deserialize()?;

        // Honor the conventional GitHub env vars when present
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                config.github.token = Some(token);
            }
        }
        if let Ok(owner) = std::env::var("GITHUB_OWNER") {
            if !owner.is_empty() {
                config.github.owner = Some(owner);
            }
        }

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
