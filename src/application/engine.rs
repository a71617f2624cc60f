//! Classification engine
//!
//! Pure two-phase evaluation of the rule catalog against one repository's
//! signal set: technology rules first, then interface rules over the
//! finalized technology set. Never blocks, never retries; running it twice
//! over the same signals yields identical results.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::application::errors::AnalysisError;
use crate::application::rules::{
    self, ENGINE_NODE_KEY, NVMRC_FILE, PACKAGE_MANIFEST, PATTERN_ENV_TOKEN, PATTERN_FETCH_CALL,
    PATTERN_SERVICE_MARKER,
};
use crate::domain::{
    DetectionResult, Interface, InterfaceDirection, InterfaceType, Repository, Signal, Technology,
    TechnologyCategory,
};

/// How a technology candidate was derived; manifest entries outrank marker
/// files when versions conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provenance {
    /// Declared repository metadata (language list)
    Metadata,
    /// Parsed manifest entry
    Manifest,
    /// Marker file presence
    Marker,
}

#[derive(Debug, Clone)]
struct Candidate {
    technology: Technology,
    provenance: Provenance,
}

/// Evaluates the rule catalog for one repository.
#[derive(Debug, Clone, Default)]
pub struct ClassificationEngine;

impl ClassificationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Produce the deduplicated detection result for one repository.
    pub fn classify(&self, repository: &Repository, signals: &[Signal]) -> DetectionResult {
        let technologies = self.collapse_technologies(self.technology_candidates(repository, signals));
        let interfaces = self.collapse_interfaces(self.interface_candidates(signals, &technologies));

        DetectionResult {
            repository: repository.clone(),
            technologies,
            interfaces,
        }
    }

    /// Phase one: collect technology candidates, duplicates allowed.
    fn technology_candidates(&self, repository: &Repository, signals: &[Signal]) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for language in repository.language_names() {
            candidates.push(Candidate {
                technology: Technology::new(language, TechnologyCategory::Language, None),
                provenance: Provenance::Metadata,
            });
        }

        for signal in signals {
            match signal {
                Signal::ManifestEntry { file, key, value } if file == PACKAGE_MANIFEST => {
                    if key == ENGINE_NODE_KEY {
                        candidates.push(Candidate {
                            technology: Technology::new(
                                "Node.js",
                                TechnologyCategory::Runtime,
                                clean_version(value),
                            ),
                            provenance: Provenance::Manifest,
                        });
                    } else if let Some(rule) = rules::dependency_rule(key) {
                        candidates.push(Candidate {
                            technology: Technology::new(
                                rule.name,
                                rule.category,
                                clean_version(value),
                            ),
                            provenance: Provenance::Manifest,
                        });
                    }
                }
                Signal::ManifestEntry { file, value, .. } if file == NVMRC_FILE => {
                    candidates.push(Candidate {
                        technology: Technology::new(
                            "Node.js",
                            TechnologyCategory::Runtime,
                            clean_version(value),
                        ),
                        provenance: Provenance::Manifest,
                    });
                }
                Signal::FileExists { path } => {
                    if let Some(rule) = rules::marker_technology_rule(path) {
                        candidates.push(Candidate {
                            technology: Technology::new(rule.name, rule.category, None),
                            provenance: Provenance::Marker,
                        });
                    }
                }
                _ => {}
            }
        }

        candidates
    }

    /// Collapse candidates on `(name, category)`.
    ///
    /// A non-null version beats a null one; when two non-null versions
    /// disagree, the manifest-derived candidate beats the marker-derived one.
    /// First-seen position is kept, so output order is stable under any rule
    /// evaluation order.
    fn collapse_technologies(&self, candidates: Vec<Candidate>) -> Vec<Technology> {
        let mut collapsed: Vec<Candidate> = Vec::new();
        let mut index: HashMap<(String, TechnologyCategory), usize> = HashMap::new();

        for candidate in candidates {
            let key = (
                candidate.technology.name.clone(),
                candidate.technology.category,
            );
            match index.get(&key) {
                None => {
                    index.insert(key, collapsed.len());
                    collapsed.push(candidate);
                }
                Some(&at) => {
                    if prefer_replacement(&collapsed[at], &candidate) {
                        collapsed[at] = candidate;
                    }
                }
            }
        }

        collapsed.into_iter().map(|c| c.technology).collect()
    }

    /// Phase two: interface candidates in catalog order.
    ///
    /// Order within the phase is the precedence order for first-seen-wins
    /// deduplication: hosting markers, scanned service tokens, the network
    /// call idiom, and finally technology-derived rules.
    fn interface_candidates(
        &self,
        signals: &[Signal],
        technologies: &[Technology],
    ) -> Vec<Interface> {
        let mut candidates = Vec::new();

        for rule in rules::HOSTING_RULES {
            let present = signals
                .iter()
                .any(|s| matches!(s, Signal::FileExists { path } if path == rule.path));
            if present {
                candidates.push(
                    Interface::new(InterfaceType::CloudService, InterfaceDirection::Hosting)
                        .with_detail("service", rule.service)
                        .with_detail("config", rule.path),
                );
            }
        }

        for signal in signals {
            let Signal::TextMatch {
                pattern, snippet, ..
            } = signal
            else {
                continue;
            };
            match pattern.as_str() {
                PATTERN_ENV_TOKEN | PATTERN_SERVICE_MARKER => {
                    if let Some(rule) = rules::service_token_rule(snippet) {
                        candidates.push(
                            Interface::new(rule.r#type, InterfaceDirection::Consumes)
                                .with_detail("service", rule.service)
                                .with_detail("variable", snippet.clone()),
                        );
                    }
                }
                PATTERN_FETCH_CALL => {}
                other => {
                    let err = AnalysisError::PatternEvaluation {
                        rule: other.to_string(),
                        message: "unknown text pattern; candidate dropped".to_string(),
                    };
                    warn!("{err}");
                }
            }
        }

        let saw_fetch = signals.iter().any(
            |s| matches!(s, Signal::TextMatch { pattern, .. } if pattern == PATTERN_FETCH_CALL),
        );
        if saw_fetch {
            candidates.push(
                Interface::new(InterfaceType::RestApi, InterfaceDirection::Consumes)
                    .with_detail("mechanism", "fetch"),
            );
        }

        for rule in rules::TECHNOLOGY_INTERFACE_RULES {
            if technologies.iter().any(|t| t.name == rule.technology) {
                candidates.push(
                    Interface::new(rule.r#type, rule.direction)
                        .with_detail(rule.detail_key, rule.technology),
                );
            }
        }

        candidates
    }

    /// Collapse interfaces on `(type, details.service)`, first seen wins.
    fn collapse_interfaces(&self, candidates: Vec<Interface>) -> Vec<Interface> {
        let mut seen: HashSet<(InterfaceType, Option<String>)> = HashSet::new();
        let mut collapsed = Vec::new();

        for candidate in candidates {
            let key = (candidate.r#type, candidate.service().map(str::to_string));
            if seen.insert(key) {
                collapsed.push(candidate);
            }
        }

        collapsed
    }
}

/// True when `candidate` should replace the already-collapsed entry.
fn prefer_replacement(existing: &Candidate, candidate: &Candidate) -> bool {
    match (&existing.technology.version, &candidate.technology.version) {
        (None, Some(_)) => true,
        (Some(a), Some(b)) if a != b => {
            candidate.provenance == Provenance::Manifest
                && existing.provenance != Provenance::Manifest
        }
        _ => false,
    }
}

/// Strip npm-style range prefixes from a declared version; wildcard specs
/// carry no version information.
fn clean_version(raw: &str) -> Option<String> {
    let version = raw
        .trim()
        .trim_start_matches(['^', '~', '=', '>', '<', 'v'])
        .trim();
    if version.is_empty() || version == "*" || version == "latest" {
        None
    } else {
        Some(version.to_string())
    }
}
