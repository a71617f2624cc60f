//! Repolens - command-line entry point
//!
//! Lists an owner's GitHub repositories, runs the detection pipeline over
//! each, and writes the `analysis_results.json` artifact.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use repolens::application::{reporting, AnalyzeEcosystemUseCase};
use repolens::config::Validate;
use repolens::infrastructure::GitHubClient;
use repolens::{init_tracing, Config};

/// Repolens - technology and interface inventory for a GitHub ecosystem
#[derive(Parser, Debug)]
#[command(
    name = "repolens",
    version,
    about = "Inventory technologies and external interfaces across a GitHub owner's repositories",
    long_about = "Repolens lists every repository of a GitHub user or organization \
                  (private ones included when GITHUB_TOKEN allows), detects the \
                  technologies and external interfaces each uses via lightweight \
                  signal scanning, and writes a JSON inventory."
)]
struct Cli {
    /// GitHub user or organization to inventory (falls back to GITHUB_OWNER)
    owner: Option<String>,

    /// Report output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cap on repositories analyzed
    #[arg(long)]
    max_repos: Option<usize>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    let mut config = Config::load().context(
        "Failed to load configuration. Check config/default.toml and REPOLENS__* env vars",
    )?;
    if let Some(output) = &cli.output {
        config.output.path = output.clone();
    }
    if let Some(max_repos) = cli.max_repos {
        config.github.max_repositories = max_repos;
    }
    if cli.compact {
        config.output.pretty = false;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config.logging).map_err(|e| anyhow::anyhow!("{e}"))?;

    let owner = cli
        .owner
        .or_else(|| config.github.owner.clone())
        .context("No owner given. Pass one as an argument or set GITHUB_OWNER")?;

    if config.github.token.is_none() {
        tracing::warn!("No GITHUB_TOKEN set; private repositories will not be visible");
    }

    let client = Arc::new(
        GitHubClient::new(&config.github, &config.analysis)
            .context("Failed to construct GitHub client")?,
    );
    let use_case =
        AnalyzeEcosystemUseCase::new(client.clone(), client, &config.analysis);

    let inventory = use_case
        .execute(&owner)
        .await
        .with_context(|| format!("Failed to list repositories for {owner}"))?;

    reporting::write_report(&config.output.path, &inventory.results, config.output.pretty)
        .with_context(|| {
            format!(
                "Cannot write output to {}",
                config.output.path.display()
            )
        })?;

    println!(
        "Analyzed {} of {} repositories ({} public, {} private, {} unavailable). Results saved to {}",
        inventory.results.len(),
        inventory.total_repositories,
        inventory.public_count,
        inventory.private_count,
        inventory.failed_repositories,
        config.output.path.display()
    );

    Ok(())
}
