//! Core domain entities

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::{Interface, Technology};

/// A source repository as reported by the repository lister
///
/// Immutable once fetched; owned by the aggregation use case for the
/// duration of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub url: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    /// Declared source languages, name to byte count
    pub languages: BTreeMap<String, u64>,
    pub default_branch: String,
}

impl Repository {
    /// Language names in stable (alphabetical) order.
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

/// The finalized, deduplicated inventory for one repository
///
/// Created fresh per run by the classification engine; no two technologies
/// share `(name, category)` and no two interfaces share `(type, service)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub repository: Repository,
    pub technologies: Vec<Technology>,
    pub interfaces: Vec<Interface>,
}
