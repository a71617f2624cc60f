//! Repolens - Repository ecosystem inventory
//!
//! Inventories a GitHub owner's repositories and classifies, per repository,
//! the technologies in use and the external interfaces exposed or consumed.
//! Detection is a declarative rule catalog evaluated over lightweight
//! signals; there is no AST-level analysis.
//!
//! # Architecture
//!
//! ```text
//! repolens/
//! ├── domain/           # Repository, Technology, Interface, Signal
//! ├── application/      # Extractor, rule catalog, engine, use cases, report
//! ├── infrastructure/   # GitHub API client behind source traits
//! ├── config/           # Configuration management
//! └── logging.rs        # Structured logging with tracing
//! ```
//!
//! Data flows one direction: repository → signals → candidate detections →
//! deduplicated result → aggregated inventory.
//!
//! # Configuration
//!
//! Environment variables use the `REPOLENS__` prefix with double underscore
//! separators:
//!
//! ```bash
//! REPOLENS__GITHUB__OWNER=acme
//! REPOLENS__ANALYSIS__MAX_CONCURRENT_REPOSITORIES=8
//! ```
//!
//! `GITHUB_TOKEN` and `GITHUB_OWNER` are honored as the common convention.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
