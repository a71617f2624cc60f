//! Shared mock implementations for testing

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use repolens::domain::Repository;
use repolens::infrastructure::{
    FileTree, FileTreeProvider, RepositoryLister, RepositoryListing, RepositorySourceError,
    RepositorySourceResult,
};

/// Mock repository lister returning a fixed listing
pub struct MockRepositoryLister {
    repositories: Vec<Repository>,
    should_fail: bool,
}

impl MockRepositoryLister {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            repositories,
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            repositories: vec![],
            should_fail: true,
        }
    }
}

#[async_trait]
impl RepositoryLister for MockRepositoryLister {
    async fn list_repositories(&self, _owner: &str) -> RepositorySourceResult<RepositoryListing> {
        if self.should_fail {
            return Err(RepositorySourceError::Http {
                status: 401,
                message: "Bad credentials".to_string(),
            });
        }
        Ok(RepositoryListing::new(self.repositories.clone()))
    }
}

/// Mock file tree provider with per-repository trees and failure injection
#[derive(Clone, Default)]
pub struct MockFileTreeProvider {
    trees: Arc<Mutex<HashMap<String, FileTree>>>,
    failures: Arc<Mutex<HashSet<String>>>,
    hang: Arc<Mutex<HashSet<String>>>,
}

impl MockFileTreeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tree(&self, full_name: &str, tree: FileTree) {
        self.trees
            .lock()
            .unwrap()
            .insert(full_name.to_string(), tree);
    }

    /// Make fetches for this repository fail
    pub fn fail_for(&self, full_name: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(full_name.to_string());
    }

    /// Make fetches for this repository block until the caller's timeout fires
    pub fn hang_for(&self, full_name: &str) {
        self.hang.lock().unwrap().insert(full_name.to_string());
    }
}

#[async_trait]
impl FileTreeProvider for MockFileTreeProvider {
    async fn fetch_file_tree(&self, repository: &Repository) -> RepositorySourceResult<FileTree> {
        let hang = self.hang.lock().unwrap().contains(&repository.full_name);
        if hang {
            tokio::time::sleep(Duration::from_secs(86_400)).await;
        }
        let failing = self
            .failures
            .lock()
            .unwrap()
            .contains(&repository.full_name);
        if failing {
            return Err(RepositorySourceError::Http {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(self
            .trees
            .lock()
            .unwrap()
            .get(&repository.full_name)
            .cloned()
            .unwrap_or_default())
    }
}
