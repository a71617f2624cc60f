//! Test data fixtures

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use repolens::domain::Repository;
use repolens::infrastructure::FileTree;

/// Create a test repository owned by `acme`
pub fn test_repository(id: i64, name: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        url: format!("https://github.com/acme/{name}"),
        description: Some(format!("Test repository {name}")),
        is_private: false,
        created_at: Some(Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap()),
        updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 10, 9, 30, 0).unwrap()),
        pushed_at: Some(Utc.with_ymd_and_hms(2024, 2, 10, 9, 30, 0).unwrap()),
        languages: BTreeMap::new(),
        default_branch: "main".to_string(),
    }
}

/// Create a test repository with declared languages
pub fn test_repository_with_languages(id: i64, name: &str, languages: &[(&str, u64)]) -> Repository {
    let mut repository = test_repository(id, name);
    repository.languages = languages
        .iter()
        .map(|(lang, bytes)| (lang.to_string(), *bytes))
        .collect();
    repository
}

/// Build a file tree from path/content pairs
pub fn file_tree(files: &[(&str, &str)]) -> FileTree {
    files
        .iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect()
}

/// The spec's end-to-end scenario: a Next.js app hosted on Vercel talking to
/// Supabase
pub fn nextjs_vercel_tree() -> FileTree {
    file_tree(&[
        (
            "package.json",
            r#"{"name": "shop", "dependencies": {"next": "14.0.0", "react": "18.2.0"}}"#,
        ),
        ("vercel.json", r#"{"framework": "nextjs"}"#),
        (
            "src/lib/db.ts",
            "const client = createClient(process.env.SUPABASE_URL);\nawait fetch('/api/items');",
        ),
    ])
}
