//! Ecosystem analysis use case

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::engine::ClassificationEngine;
use crate::application::errors::AnalysisError;
use crate::application::extractor::SignalExtractor;
use crate::config::AnalysisConfig;
use crate::domain::{DetectionResult, Repository};
use crate::infrastructure::repository_source::{
    FileTreeProvider, RepositoryLister, RepositorySourceError, RepositorySourceResult,
};

/// Outcome of one inventory run
#[derive(Debug)]
pub struct EcosystemInventory {
    /// Successful per-repository results, in listing order
    pub results: Vec<DetectionResult>,
    /// Repositories the lister reported
    pub total_repositories: usize,
    pub public_count: usize,
    pub private_count: usize,
    /// Repositories excluded because their file tree was unavailable
    pub failed_repositories: usize,
}

/// Runs the classification engine over every repository of an owner.
///
/// Repositories are analyzed independently on a bounded worker pool; a
/// failure on one repository is logged and excluded from the output, never
/// aborting the batch. Input order is preserved for successful results.
pub struct AnalyzeEcosystemUseCase {
    lister: Arc<dyn RepositoryLister>,
    file_trees: Arc<dyn FileTreeProvider>,
    extractor: Arc<SignalExtractor>,
    engine: Arc<ClassificationEngine>,
    max_concurrent: usize,
    fetch_timeout: Duration,
}

impl AnalyzeEcosystemUseCase {
    pub fn new(
        lister: Arc<dyn RepositoryLister>,
        file_trees: Arc<dyn FileTreeProvider>,
        config: &AnalysisConfig,
    ) -> Self {
        Self {
            lister,
            file_trees,
            extractor: Arc::new(SignalExtractor::new(config)),
            engine: Arc::new(ClassificationEngine::new()),
            max_concurrent: config.max_concurrent_repositories,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_seconds),
        }
    }

    /// List the owner's repositories and analyze each of them.
    ///
    /// Only a failing listing is fatal; per-repository failures are isolated.
    pub async fn execute(&self, owner: &str) -> RepositorySourceResult<EcosystemInventory> {
        let started = Instant::now();
        info!(owner, "Listing repositories");

        let listing = self.lister.list_repositories(owner).await?;
        info!(
            total = listing.total(),
            public = listing.public_count,
            private = listing.private_count,
            "Repository listing complete"
        );

        let total_repositories = listing.total();
        let public_count = listing.public_count;
        let private_count = listing.private_count;

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_concurrent));
        let mut join_set: JoinSet<(usize, Option<DetectionResult>)> = JoinSet::new();

        for (index, repository) in listing.repositories.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore);
            let file_trees = Arc::clone(&self.file_trees);
            let extractor = Arc::clone(&self.extractor);
            let engine = Arc::clone(&self.engine);
            let fetch_timeout = self.fetch_timeout;

            join_set.spawn(async move {
                let _permit = match permit.acquire().await {
                    Ok(permit) => permit,
                    // Semaphore closes only on shutdown; treat as a skip
                    Err(_) => return (index, None),
                };
                let result =
                    analyze_repository(&*file_trees, &extractor, &engine, &repository, fetch_timeout)
                        .await;
                match result {
                    Ok(detection) => (index, Some(detection)),
                    Err(err) => {
                        warn!("{err}");
                        (index, None)
                    }
                }
            });
        }

        let mut indexed: Vec<(usize, Option<DetectionResult>)> = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(entry) => indexed.push(entry),
                Err(e) => warn!("Analysis task panicked: {e}"),
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let mut results = Vec::new();
        let mut failed_repositories = total_repositories;
        for (_, entry) in indexed {
            if let Some(detection) = entry {
                results.push(detection);
            }
        }
        failed_repositories -= results.len();

        info!(
            analyzed = results.len(),
            failed = failed_repositories,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ecosystem analysis complete"
        );

        Ok(EcosystemInventory {
            results,
            total_repositories,
            public_count,
            private_count,
            failed_repositories,
        })
    }
}

/// Analyze one repository: fetch its file tree (bounded by the per-repository
/// timeout), extract signals, classify. Pure computation after the fetch.
async fn analyze_repository(
    file_trees: &dyn FileTreeProvider,
    extractor: &SignalExtractor,
    engine: &ClassificationEngine,
    repository: &Repository,
    fetch_timeout: Duration,
) -> Result<DetectionResult, AnalysisError> {
    debug!(repository = %repository.full_name, "Analyzing repository");

    let tree = match tokio::time::timeout(fetch_timeout, file_trees.fetch_file_tree(repository))
        .await
    {
        Ok(Ok(tree)) => tree,
        Ok(Err(source)) => {
            return Err(AnalysisError::RepositoryUnavailable {
                repository: repository.full_name.clone(),
                source,
            });
        }
        Err(_) => {
            return Err(AnalysisError::RepositoryUnavailable {
                repository: repository.full_name.clone(),
                source: RepositorySourceError::Timeout {
                    seconds: fetch_timeout.as_secs(),
                },
            });
        }
    };

    let signals = extractor.extract(&tree);
    debug!(
        repository = %repository.full_name,
        signals = signals.len(),
        "Signal extraction complete"
    );

    Ok(engine.classify(repository, &signals))
}
