//! Detection value objects

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category of a detected technology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyCategory {
    Language,
    Framework,
    Runtime,
    Database,
    Tool,
}

impl std::fmt::Display for TechnologyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Language => write!(f, "language"),
            Self::Framework => write!(f, "framework"),
            Self::Runtime => write!(f, "runtime"),
            Self::Database => write!(f, "database"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// A detected technology (language, framework, runtime, database, or tool)
///
/// Identity within one detection result is the `(name, category)` pair;
/// the classification engine never emits two technologies sharing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub category: TechnologyCategory,
    pub version: Option<String>,
}

impl Technology {
    pub fn new(
        name: impl Into<String>,
        category: TechnologyCategory,
        version: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            version,
        }
    }

    /// Deduplication key: two technologies with the same key are the same entry.
    pub fn dedup_key(&self) -> (&str, TechnologyCategory) {
        (&self.name, self.category)
    }
}

/// Kind of external interface a repository exposes or consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceType {
    RestApi,
    DatabaseConnection,
    Cache,
    PaymentGateway,
    CloudService,
}

impl std::fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RestApi => write!(f, "rest_api"),
            Self::DatabaseConnection => write!(f, "database_connection"),
            Self::Cache => write!(f, "cache"),
            Self::PaymentGateway => write!(f, "payment_gateway"),
            Self::CloudService => write!(f, "cloud_service"),
        }
    }
}

/// Whether the repository provides, consumes, or is hosted on the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterfaceDirection {
    Provides,
    Consumes,
    Hosting,
}

/// A detected external interface
///
/// `details` carries rule-specific context (`service`, `framework`,
/// `variable`, ...) as plain strings. Identity is `(type, details.service)`:
/// two interfaces naming the same service collapse into one regardless of
/// which rule produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub r#type: InterfaceType,
    pub direction: InterfaceDirection,
    pub details: BTreeMap<String, String>,
}

impl Interface {
    pub fn new(r#type: InterfaceType, direction: InterfaceDirection) -> Self {
        Self {
            r#type,
            direction,
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// The service named by this interface, if any.
    pub fn service(&self) -> Option<&str> {
        self.details.get("service").map(String::as_str)
    }

    /// Deduplication key: interface type plus named service.
    pub fn dedup_key(&self) -> (InterfaceType, Option<&str>) {
        (self.r#type, self.service())
    }
}

/// A single normalized observation extracted from repository content.
///
/// Signals are produced fresh per repository by the signal extractor and
/// never persisted; the classification engine is a pure function over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Signal {
    /// A key/value entry from a structured manifest file
    ManifestEntry {
        file: String,
        key: String,
        value: String,
    },
    /// A well-known marker file is present
    FileExists { path: String },
    /// A text pattern matched somewhere in the repository content
    TextMatch {
        pattern: String,
        snippet: String,
        path: String,
    },
}
