//! Declarative detection rule catalog
//!
//! The catalog is static configuration: ordered tables the classification
//! engine interprets, not code paths it branches through. Adding a detection
//! means adding a row here; the engine never changes.
//!
//! Catalog order is significant where noted: interface entries produced by
//! earlier rules win first-seen-wins deduplication against later ones.

use crate::domain::value_objects::{InterfaceDirection, InterfaceType, TechnologyCategory};

/// Manifest file the dependency rules read
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Manifest key carrying the declared runtime version
pub const ENGINE_NODE_KEY: &str = "engines.node";

/// Standalone runtime-version file consulted when the manifest key is absent
pub const NVMRC_FILE: &str = ".nvmrc";

/// Text pattern identifiers shared between the extractor and the engine
pub const PATTERN_ENV_TOKEN: &str = "env_token";
pub const PATTERN_SERVICE_MARKER: &str = "service_marker";
pub const PATTERN_FETCH_CALL: &str = "fetch_call";

/// A manifest dependency key implying a technology, carrying the declared version
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub package: &'static str,
    pub name: &'static str,
    pub category: TechnologyCategory,
}

/// Dependency-key detections, keyed on `dependencies` / `devDependencies`
pub const DEPENDENCY_RULES: &[DependencyRule] = &[
    DependencyRule {
        package: "next",
        name: "Next.js",
        category: TechnologyCategory::Framework,
    },
    DependencyRule {
        package: "react",
        name: "React",
        category: TechnologyCategory::Framework,
    },
    DependencyRule {
        package: "vue",
        name: "Vue",
        category: TechnologyCategory::Framework,
    },
    DependencyRule {
        package: "express",
        name: "Express",
        category: TechnologyCategory::Framework,
    },
    DependencyRule {
        package: "@nestjs/core",
        name: "NestJS",
        category: TechnologyCategory::Framework,
    },
    DependencyRule {
        package: "@prisma/client",
        name: "Prisma",
        category: TechnologyCategory::Database,
    },
    DependencyRule {
        package: "typescript",
        name: "TypeScript",
        category: TechnologyCategory::Language,
    },
    DependencyRule {
        package: "tailwindcss",
        name: "Tailwind CSS",
        category: TechnologyCategory::Framework,
    },
];

/// A well-known filename whose mere presence implies a technology
#[derive(Debug, Clone, Copy)]
pub struct MarkerTechnologyRule {
    pub path: &'static str,
    pub name: &'static str,
    pub category: TechnologyCategory,
}

/// Marker-file detections. These are weaker than manifest-derived entries:
/// when both fire for one `(name, category)` key, the manifest version wins.
pub const MARKER_TECHNOLOGY_RULES: &[MarkerTechnologyRule] = &[
    MarkerTechnologyRule {
        path: "package.json",
        name: "Node.js",
        category: TechnologyCategory::Runtime,
    },
    MarkerTechnologyRule {
        path: "Dockerfile",
        name: "Docker",
        category: TechnologyCategory::Tool,
    },
    MarkerTechnologyRule {
        path: "Cargo.toml",
        name: "Rust",
        category: TechnologyCategory::Language,
    },
    MarkerTechnologyRule {
        path: "go.mod",
        name: "Go",
        category: TechnologyCategory::Language,
    },
    MarkerTechnologyRule {
        path: "requirements.txt",
        name: "Python",
        category: TechnologyCategory::Language,
    },
    MarkerTechnologyRule {
        path: "pyproject.toml",
        name: "Python",
        category: TechnologyCategory::Language,
    },
    MarkerTechnologyRule {
        path: "Gemfile",
        name: "Ruby",
        category: TechnologyCategory::Language,
    },
];

/// A hosting/platform config file implying a cloud hosting interface
#[derive(Debug, Clone, Copy)]
pub struct HostingRule {
    pub path: &'static str,
    pub service: &'static str,
}

/// Marker-file to hosting-service table
pub const HOSTING_RULES: &[HostingRule] = &[
    HostingRule {
        path: "vercel.json",
        service: "Vercel",
    },
    HostingRule {
        path: "fly.toml",
        service: "Fly.io",
    },
    HostingRule {
        path: "netlify.toml",
        service: "Netlify",
    },
    HostingRule {
        path: "firebase.json",
        service: "Firebase",
    },
];

/// All marker filenames the extractor emits existence signals for
pub fn marker_paths() -> impl Iterator<Item = &'static str> {
    MARKER_TECHNOLOGY_RULES
        .iter()
        .map(|rule| rule.path)
        .chain(HOSTING_RULES.iter().map(|rule| rule.path))
}

/// A substring of an environment-style token mapped to a consumed service
#[derive(Debug, Clone, Copy)]
pub struct ServiceTokenRule {
    pub fragment: &'static str,
    pub r#type: InterfaceType,
    pub service: &'static str,
}

/// Substring-to-service table for scanned tokens. Substring match, not exact:
/// `PROD_AWS_SECRET_ACCESS_KEY` still maps to AWS. First fragment wins, so
/// each token maps to at most one interface.
pub const SERVICE_TOKEN_RULES: &[ServiceTokenRule] = &[
    ServiceTokenRule {
        fragment: "STRIPE",
        r#type: InterfaceType::PaymentGateway,
        service: "Stripe",
    },
    ServiceTokenRule {
        fragment: "SUPABASE",
        r#type: InterfaceType::DatabaseConnection,
        service: "Supabase",
    },
    ServiceTokenRule {
        fragment: "FIREBASE",
        r#type: InterfaceType::CloudService,
        service: "Firebase",
    },
    ServiceTokenRule {
        fragment: "OPENAI",
        r#type: InterfaceType::RestApi,
        service: "OpenAI",
    },
    ServiceTokenRule {
        fragment: "REDIS",
        r#type: InterfaceType::Cache,
        service: "Redis",
    },
    ServiceTokenRule {
        fragment: "AWS",
        r#type: InterfaceType::CloudService,
        service: "AWS",
    },
    ServiceTokenRule {
        fragment: "S3",
        r#type: InterfaceType::CloudService,
        service: "AWS",
    },
];

/// Tokens that are pure generic suffixes; discarded as false positives
/// before service mapping.
pub const GENERIC_TOKENS: &[&str] = &["URL", "KEY", "TOKEN", "SECRET"];

/// A finalized technology implying an interface (derivation-chain rules;
/// evaluated after the technology phase)
#[derive(Debug, Clone, Copy)]
pub struct TechnologyInterfaceRule {
    pub technology: &'static str,
    pub r#type: InterfaceType,
    pub direction: InterfaceDirection,
    /// Detail key under which the implying technology is recorded
    pub detail_key: &'static str,
}

/// Technology-derived interface rules. These come last in the interface
/// catalog, so a text-derived entry for the same dedup key takes precedence.
pub const TECHNOLOGY_INTERFACE_RULES: &[TechnologyInterfaceRule] = &[
    TechnologyInterfaceRule {
        technology: "Next.js",
        r#type: InterfaceType::RestApi,
        direction: InterfaceDirection::Provides,
        detail_key: "framework",
    },
    TechnologyInterfaceRule {
        technology: "Express",
        r#type: InterfaceType::RestApi,
        direction: InterfaceDirection::Provides,
        detail_key: "framework",
    },
    TechnologyInterfaceRule {
        technology: "NestJS",
        r#type: InterfaceType::RestApi,
        direction: InterfaceDirection::Provides,
        detail_key: "framework",
    },
    TechnologyInterfaceRule {
        technology: "Prisma",
        r#type: InterfaceType::DatabaseConnection,
        direction: InterfaceDirection::Consumes,
        detail_key: "orm",
    },
];

/// Look up the dependency rule for a manifest dependency key.
pub fn dependency_rule(package: &str) -> Option<&'static DependencyRule> {
    DEPENDENCY_RULES.iter().find(|rule| rule.package == package)
}

/// Look up the marker rule for a present file.
pub fn marker_technology_rule(path: &str) -> Option<&'static MarkerTechnologyRule> {
    MARKER_TECHNOLOGY_RULES.iter().find(|rule| rule.path == path)
}

/// Look up the hosting rule for a present file.
pub fn hosting_rule(path: &str) -> Option<&'static HostingRule> {
    HOSTING_RULES.iter().find(|rule| rule.path == path)
}

/// True for tokens that are exactly a generic suffix (`URL`, `KEY`, ...).
pub fn is_generic_token(token: &str) -> bool {
    GENERIC_TOKENS.contains(&token)
}

/// Map a scanned token to its service rule, if any. Generic tokens are
/// filtered out before the substring table is consulted.
pub fn service_token_rule(token: &str) -> Option<&'static ServiceTokenRule> {
    if is_generic_token(token) {
        return None;
    }
    SERVICE_TOKEN_RULES
        .iter()
        .find(|rule| token.contains(rule.fragment))
}
