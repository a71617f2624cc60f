//! End-to-end analysis over mocked repository sources

mod common;

use std::sync::Arc;

use common::fixtures::{file_tree, nextjs_vercel_tree, test_repository, test_repository_with_languages};
use common::mocks::{MockFileTreeProvider, MockRepositoryLister};
use repolens::application::{reporting, AnalyzeEcosystemUseCase};
use repolens::config::AnalysisConfig;
use repolens::domain::{InterfaceDirection, InterfaceType, TechnologyCategory};

fn use_case(
    lister: MockRepositoryLister,
    trees: MockFileTreeProvider,
    config: &AnalysisConfig,
) -> AnalyzeEcosystemUseCase {
    AnalyzeEcosystemUseCase::new(Arc::new(lister), Arc::new(trees), config)
}

#[tokio::test]
async fn one_failing_repository_does_not_abort_the_batch() {
    let repositories: Vec<_> = (1..=5)
        .map(|i| test_repository(i, &format!("repo-{i}")))
        .collect();
    let trees = MockFileTreeProvider::new();
    for repository in &repositories {
        trees.add_tree(
            &repository.full_name,
            file_tree(&[("package.json", r#"{"dependencies": {"react": "18.2.0"}}"#)]),
        );
    }
    trees.fail_for("acme/repo-3");

    let analysis = AnalysisConfig::default();
    let inventory = use_case(MockRepositoryLister::new(repositories), trees, &analysis)
        .execute("acme")
        .await
        .unwrap();

    assert_eq!(inventory.total_repositories, 5);
    assert_eq!(inventory.failed_repositories, 1);
    assert_eq!(inventory.results.len(), 4);
    // Listing order is preserved with the failed repository excluded
    let names: Vec<_> = inventory
        .results
        .iter()
        .map(|r| r.repository.name.as_str())
        .collect();
    assert_eq!(names, vec!["repo-1", "repo-2", "repo-4", "repo-5"]);
}

#[tokio::test(start_paused = true)]
async fn hanging_fetch_times_out_and_is_excluded() {
    let repositories = vec![test_repository(1, "fast"), test_repository(2, "slow")];
    let trees = MockFileTreeProvider::new();
    trees.add_tree("acme/fast", file_tree(&[("Cargo.toml", "[package]")]));
    trees.hang_for("acme/slow");

    let analysis = AnalysisConfig {
        fetch_timeout_seconds: 5,
        ..AnalysisConfig::default()
    };
    let inventory = use_case(MockRepositoryLister::new(repositories), trees, &analysis)
        .execute("acme")
        .await
        .unwrap();

    assert_eq!(inventory.results.len(), 1);
    assert_eq!(inventory.results[0].repository.name, "fast");
    assert_eq!(inventory.failed_repositories, 1);
}

#[tokio::test]
async fn failing_listing_is_fatal() {
    let trees = MockFileTreeProvider::new();
    let analysis = AnalysisConfig::default();

    let result = use_case(MockRepositoryLister::failing(), trees, &analysis)
        .execute("acme")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn nextjs_vercel_supabase_scenario() {
    let repository = test_repository_with_languages(7, "shop", &[("TypeScript", 12000)]);
    let trees = MockFileTreeProvider::new();
    trees.add_tree("acme/shop", nextjs_vercel_tree());

    let analysis = AnalysisConfig::default();
    let inventory = use_case(
        MockRepositoryLister::new(vec![repository]),
        trees,
        &analysis,
    )
    .execute("acme")
    .await
    .unwrap();

    assert_eq!(inventory.results.len(), 1);
    let result = &inventory.results[0];

    let tech = |name: &str| result.technologies.iter().find(|t| t.name == name);
    assert_eq!(
        tech("TypeScript").map(|t| t.category),
        Some(TechnologyCategory::Language)
    );
    assert_eq!(tech("Next.js").and_then(|t| t.version.as_deref()), Some("14.0.0"));
    assert_eq!(tech("React").and_then(|t| t.version.as_deref()), Some("18.2.0"));
    assert!(tech("Node.js").is_some());

    // Vercel hosting from the marker file
    let vercel = result
        .interfaces
        .iter()
        .find(|i| i.service() == Some("Vercel"))
        .unwrap();
    assert_eq!(vercel.r#type, InterfaceType::CloudService);
    assert_eq!(vercel.direction, InterfaceDirection::Hosting);

    // Supabase consumption from the scanned env token
    let supabase = result
        .interfaces
        .iter()
        .find(|i| i.service() == Some("Supabase"))
        .unwrap();
    assert_eq!(supabase.r#type, InterfaceType::DatabaseConnection);
    assert_eq!(supabase.direction, InterfaceDirection::Consumes);

    // The fetch call records outbound REST consumption even with Next.js present
    let rest: Vec<_> = result
        .interfaces
        .iter()
        .filter(|i| i.r#type == InterfaceType::RestApi)
        .collect();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].direction, InterfaceDirection::Consumes);
}

#[tokio::test]
async fn report_uses_stable_camel_case_field_names() {
    let repository = test_repository_with_languages(7, "shop", &[("TypeScript", 12000)]);
    let trees = MockFileTreeProvider::new();
    trees.add_tree("acme/shop", nextjs_vercel_tree());

    let analysis = AnalysisConfig::default();
    let inventory = use_case(
        MockRepositoryLister::new(vec![repository]),
        trees,
        &analysis,
    )
    .execute("acme")
    .await
    .unwrap();

    let body = reporting::generate_json_report(&inventory.results, false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

    let repo = &parsed[0]["repo"];
    assert_eq!(repo["fullName"], "acme/shop");
    assert_eq!(repo["nameWithOwner"], "acme/shop");
    assert_eq!(repo["isPrivate"], false);
    assert_eq!(repo["defaultBranchRef"]["name"], "main");
    assert_eq!(repo["languages"][0]["node"]["name"], "TypeScript");

    let directions: Vec<_> = parsed[0]["interfaces"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["direction"].as_str().unwrap().to_string())
        .collect();
    assert!(directions
        .iter()
        .all(|d| ["PROVIDES", "CONSUMES", "HOSTING"].contains(&d.as_str())));
    assert!(parsed[0]["technologies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["category"] == "framework"));
}

#[tokio::test]
async fn report_is_written_to_disk() {
    let repository = test_repository(1, "tiny");
    let trees = MockFileTreeProvider::new();
    trees.add_tree("acme/tiny", file_tree(&[("go.mod", "module tiny")]));

    let analysis = AnalysisConfig::default();
    let inventory = use_case(
        MockRepositoryLister::new(vec![repository]),
        trees,
        &analysis,
    )
    .execute("acme")
    .await
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis_results.json");
    reporting::write_report(&path, &inventory.results, true).unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert!(parsed[0]["technologies"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["name"] == "Go"));
}
