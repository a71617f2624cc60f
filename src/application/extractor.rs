//! Signal extraction
//!
//! Turns a repository's fetched file tree into the normalized signal set the
//! classification engine consumes, in one pass: manifest entries, marker
//! file existence flags, and capped text pattern matches.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::application::errors::AnalysisError;
use crate::application::rules::{
    self, ENGINE_NODE_KEY, NVMRC_FILE, PACKAGE_MANIFEST, PATTERN_ENV_TOKEN, PATTERN_FETCH_CALL,
    PATTERN_SERVICE_MARKER,
};
use crate::config::AnalysisConfig;
use crate::domain::Signal;
use crate::infrastructure::repository_source::FileTree;

/// Upper-case identifiers ending in a generic secret/URL suffix
static ENV_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Z0-9_]*_(?:URL|KEY|TOKEN|SECRET)\b").unwrap());

/// Bare service marker tokens
static SERVICE_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:STRIPE|AWS|S3|REDIS|OPENAI|SUPABASE|FIREBASE)\b").unwrap());

/// Network call idiom
static FETCH_CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"fetch\(").unwrap());

/// Extracts the complete signal set for one repository.
///
/// Extraction never fails: an unparseable manifest degrades to skipping that
/// manifest's signals (logged), and the text scan is bounded by the
/// configured byte and match caps.
#[derive(Debug, Clone)]
pub struct SignalExtractor {
    max_scan_bytes: u64,
    max_matches_per_pattern: usize,
}

impl SignalExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_scan_bytes: config.max_scan_bytes,
            max_matches_per_pattern: config.max_matches_per_pattern,
        }
    }

    /// Produce all signals for the given file tree.
    pub fn extract(&self, tree: &FileTree) -> Vec<Signal> {
        let mut signals = Vec::new();
        self.extract_manifest_signals(tree, &mut signals);
        self.extract_existence_signals(tree, &mut signals);
        self.extract_text_signals(tree, &mut signals);
        signals
    }

    fn extract_manifest_signals(&self, tree: &FileTree, signals: &mut Vec<Signal>) {
        let mut engine_version_seen = false;

        if let Some(content) = tree.get(PACKAGE_MANIFEST) {
            match serde_json::from_str::<Value>(content) {
                Ok(manifest) => {
                    for section in ["dependencies", "devDependencies"] {
                        let Some(deps) = manifest.get(section).and_then(Value::as_object) else {
                            continue;
                        };
                        for (name, version) in deps {
                            let Some(version) = version.as_str() else {
                                continue;
                            };
                            signals.push(Signal::ManifestEntry {
                                file: PACKAGE_MANIFEST.to_string(),
                                key: name.clone(),
                                value: version.to_string(),
                            });
                        }
                    }

                    if let Some(node) = manifest
                        .get("engines")
                        .and_then(|e| e.get("node"))
                        .and_then(Value::as_str)
                    {
                        engine_version_seen = true;
                        signals.push(Signal::ManifestEntry {
                            file: PACKAGE_MANIFEST.to_string(),
                            key: ENGINE_NODE_KEY.to_string(),
                            value: node.to_string(),
                        });
                    }
                }
                Err(e) => {
                    let err = AnalysisError::ManifestParse {
                        file: PACKAGE_MANIFEST.to_string(),
                        message: e.to_string(),
                    };
                    warn!("{err}");
                }
            }
        }

        // Standalone runtime-version file, only when the manifest field is absent
        if !engine_version_seen {
            if let Some(content) = tree.get(NVMRC_FILE) {
                let version = content.trim();
                if !version.is_empty() {
                    signals.push(Signal::ManifestEntry {
                        file: NVMRC_FILE.to_string(),
                        key: "node".to_string(),
                        value: version.trim_start_matches('v').to_string(),
                    });
                }
            }
        }
    }

    fn extract_existence_signals(&self, tree: &FileTree, signals: &mut Vec<Signal>) {
        for path in rules::marker_paths() {
            if tree.contains(path) {
                signals.push(Signal::FileExists {
                    path: path.to_string(),
                });
            }
        }
    }

    fn extract_text_signals(&self, tree: &FileTree, signals: &mut Vec<Signal>) {
        let patterns: [(&str, &Regex); 3] = [
            (PATTERN_ENV_TOKEN, &ENV_TOKEN_RE),
            (PATTERN_SERVICE_MARKER, &SERVICE_MARKER_RE),
            (PATTERN_FETCH_CALL, &FETCH_CALL_RE),
        ];
        let mut seen: [Vec<String>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        let mut remaining = self.max_scan_bytes as usize;

        for (path, content) in tree.iter() {
            if remaining == 0 {
                break;
            }
            let slice = prefix_at_char_boundary(content, remaining);
            remaining -= slice.len();

            for (idx, (pattern, regex)) in patterns.iter().enumerate() {
                let matches = &mut seen[idx];
                if matches.len() >= self.max_matches_per_pattern {
                    continue;
                }
                for found in regex.find_iter(slice) {
                    let snippet = found.as_str();
                    if matches.iter().any(|m| m == snippet) {
                        continue;
                    }
                    matches.push(snippet.to_string());
                    signals.push(Signal::TextMatch {
                        pattern: pattern.to_string(),
                        snippet: snippet.to_string(),
                        path: path.to_string(),
                    });
                    if matches.len() >= self.max_matches_per_pattern {
                        break;
                    }
                }
            }
        }
    }
}

/// Longest prefix of `s` no larger than `max` bytes that ends on a char boundary.
fn prefix_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SignalExtractor {
        SignalExtractor::new(&AnalysisConfig::default())
    }

    fn tree(files: &[(&str, &str)]) -> FileTree {
        files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn manifest_dependencies_become_entries() {
        let tree = tree(&[(
            "package.json",
            r#"{"dependencies": {"next": "14.0.0"}, "devDependencies": {"typescript": "5.2.0"}}"#,
        )]);
        let signals = extractor().extract(&tree);

        assert!(signals.contains(&Signal::ManifestEntry {
            file: "package.json".into(),
            key: "next".into(),
            value: "14.0.0".into(),
        }));
        assert!(signals.contains(&Signal::ManifestEntry {
            file: "package.json".into(),
            key: "typescript".into(),
            value: "5.2.0".into(),
        }));
    }

    #[test]
    fn engines_node_suppresses_nvmrc() {
        let tree = tree(&[
            ("package.json", r#"{"engines": {"node": ">=20"}}"#),
            (".nvmrc", "v18.19.0\n"),
        ]);
        let signals = extractor().extract(&tree);

        assert!(signals.contains(&Signal::ManifestEntry {
            file: "package.json".into(),
            key: "engines.node".into(),
            value: ">=20".into(),
        }));
        assert!(!signals
            .iter()
            .any(|s| matches!(s, Signal::ManifestEntry { file, .. } if file == ".nvmrc")));
    }

    #[test]
    fn nvmrc_used_when_manifest_field_absent() {
        let tree = tree(&[("package.json", r#"{"name": "app"}"#), (".nvmrc", "v20.11.1")]);
        let signals = extractor().extract(&tree);

        assert!(signals.contains(&Signal::ManifestEntry {
            file: ".nvmrc".into(),
            key: "node".into(),
            value: "20.11.1".into(),
        }));
    }

    #[test]
    fn malformed_manifest_degrades_to_other_signals() {
        let tree = tree(&[("package.json", "{not json"), ("Dockerfile", "FROM node:20")]);
        let signals = extractor().extract(&tree);

        // No manifest entries, but existence signals survive
        assert!(!signals
            .iter()
            .any(|s| matches!(s, Signal::ManifestEntry { .. })));
        assert!(signals.contains(&Signal::FileExists {
            path: "package.json".into()
        }));
        assert!(signals.contains(&Signal::FileExists {
            path: "Dockerfile".into()
        }));
    }

    #[test]
    fn marker_files_emit_existence_signals() {
        let tree = tree(&[("vercel.json", "{}"), ("fly.toml", "[build]")]);
        let signals = extractor().extract(&tree);

        assert!(signals.contains(&Signal::FileExists {
            path: "vercel.json".into()
        }));
        assert!(signals.contains(&Signal::FileExists {
            path: "fly.toml".into()
        }));
    }

    #[test]
    fn text_patterns_match_tokens_and_call_idiom() {
        let tree = tree(&[(
            "src/db.ts",
            "const url = process.env.NEXT_PUBLIC_SUPABASE_URL;\nawait fetch(url);",
        )]);
        let signals = extractor().extract(&tree);

        assert!(signals.contains(&Signal::TextMatch {
            pattern: PATTERN_ENV_TOKEN.into(),
            snippet: "NEXT_PUBLIC_SUPABASE_URL".into(),
            path: "src/db.ts".into(),
        }));
        assert!(signals.contains(&Signal::TextMatch {
            pattern: PATTERN_FETCH_CALL.into(),
            snippet: "fetch(".into(),
            path: "src/db.ts".into(),
        }));
    }

    #[test]
    fn lowercase_tokens_do_not_match() {
        let tree = tree(&[("a.js", "const stripe_key = 1; fetchData();")]);
        let signals = extractor().extract(&tree);
        assert!(!signals
            .iter()
            .any(|s| matches!(s, Signal::TextMatch { .. })));
    }

    #[test]
    fn distinct_matches_are_capped_per_pattern() {
        let mut content = String::new();
        for i in 0..50 {
            content.push_str(&format!("VAR_{i}_API_KEY "));
        }
        let tree = tree(&[("big.env", content.as_str())]);
        let signals = extractor().extract(&tree);

        let env_matches = signals
            .iter()
            .filter(|s| matches!(s, Signal::TextMatch { pattern, .. } if pattern == PATTERN_ENV_TOKEN))
            .count();
        assert_eq!(env_matches, 20);
    }

    #[test]
    fn repeated_token_emits_one_signal() {
        let tree = tree(&[("a.js", "STRIPE_SECRET_KEY STRIPE_SECRET_KEY STRIPE_SECRET_KEY")]);
        let signals = extractor().extract(&tree);
        let count = signals
            .iter()
            .filter(|s| matches!(s, Signal::TextMatch { snippet, .. } if snippet == "STRIPE_SECRET_KEY"))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn scan_respects_byte_budget() {
        let config = AnalysisConfig {
            max_scan_bytes: 10,
            ..AnalysisConfig::default()
        };
        let extractor = SignalExtractor::new(&config);
        // Token sits past the byte budget, so it is never scanned
        let tree = tree(&[("a.js", "0123456789 STRIPE_SECRET_KEY")]);
        let signals = extractor.extract(&tree);
        assert!(!signals
            .iter()
            .any(|s| matches!(s, Signal::TextMatch { .. })));
    }

    #[test]
    fn empty_tree_yields_no_signals() {
        assert!(extractor().extract(&FileTree::new()).is_empty());
    }

    #[test]
    fn prefix_respects_char_boundaries() {
        let s = "héllo";
        let p = prefix_at_char_boundary(s, 2);
        assert_eq!(p, "h");
    }
}
