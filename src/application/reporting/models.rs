//! Report data models
//!
//! Field names here are the output artifact's durable contract; renaming any
//! of them breaks downstream consumers of `analysis_results.json`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    DetectionResult, Interface, InterfaceDirection, InterfaceType, Technology, TechnologyCategory,
};

/// One repository's record in the report artifact
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryAnalysisRecord {
    pub repo: RepositoryRecord,
    pub technologies: Vec<TechnologyRecord>,
    pub interfaces: Vec<InterfaceRecord>,
}

/// Repository metadata with stable camelCase field names
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryRecord {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub name_with_owner: String,
    pub url: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub languages: Vec<LanguageNode>,
    pub default_branch_ref: BranchRef,
}

/// Language entry, nested `{"node": {"name": ...}}` shape
#[derive(Debug, Clone, Serialize)]
pub struct LanguageNode {
    pub node: LanguageName,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageName {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TechnologyRecord {
    pub name: String,
    pub category: TechnologyCategory,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterfaceRecord {
    pub r#type: InterfaceType,
    pub direction: InterfaceDirection,
    pub details: BTreeMap<String, String>,
}

impl From<&Technology> for TechnologyRecord {
    fn from(technology: &Technology) -> Self {
        Self {
            name: technology.name.clone(),
            category: technology.category,
            version: technology.version.clone(),
        }
    }
}

impl From<&Interface> for InterfaceRecord {
    fn from(interface: &Interface) -> Self {
        Self {
            r#type: interface.r#type,
            direction: interface.direction,
            details: interface.details.clone(),
        }
    }
}

impl From<&DetectionResult> for RepositoryAnalysisRecord {
    fn from(result: &DetectionResult) -> Self {
        let repository = &result.repository;
        Self {
            repo: RepositoryRecord {
                id: repository.id,
                name: repository.name.clone(),
                full_name: repository.full_name.clone(),
                name_with_owner: repository.full_name.clone(),
                url: repository.url.clone(),
                description: repository.description.clone(),
                is_private: repository.is_private,
                created_at: repository.created_at,
                updated_at: repository.updated_at,
                pushed_at: repository.pushed_at,
                languages: repository
                    .language_names()
                    .map(|name| LanguageNode {
                        node: LanguageName {
                            name: name.to_string(),
                        },
                    })
                    .collect(),
                default_branch_ref: BranchRef {
                    name: repository.default_branch.clone(),
                },
            },
            technologies: result.technologies.iter().map(Into::into).collect(),
            interfaces: result.interfaces.iter().map(Into::into).collect(),
        }
    }
}
