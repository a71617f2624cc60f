//! Repository source abstractions
//!
//! The analysis pipeline treats repository listing and file tree access as
//! external collaborators behind these traits; the GitHub implementation
//! lives in [`crate::infrastructure::api_clients::github`] and tests swap in
//! in-memory mocks.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::Repository;

/// Result type for repository source operations
pub type RepositorySourceResult<T> = Result<T, RepositorySourceError>;

/// Errors surfaced by repository source collaborators
#[derive(Debug, thiserror::Error)]
pub enum RepositorySourceError {
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        retry_after: Option<u64>,
        message: String,
    },

    #[error("Failed to decode content of {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Fetch timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Listing of an owner's repositories with a visibility breakdown
#[derive(Debug, Clone, Default)]
pub struct RepositoryListing {
    /// Repositories in the order reported by the source
    pub repositories: Vec<Repository>,
    pub public_count: usize,
    pub private_count: usize,
}

impl RepositoryListing {
    pub fn new(repositories: Vec<Repository>) -> Self {
        let private_count = repositories.iter().filter(|r| r.is_private).count();
        let public_count = repositories.len() - private_count;
        Self {
            repositories,
            public_count,
            private_count,
        }
    }

    pub fn total(&self) -> usize {
        self.repositories.len()
    }
}

/// A repository's fetched file tree: relative path to text content.
///
/// Only files the provider chose to materialize are present; the signal
/// extractor works entirely off this snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    files: BTreeMap<String, String>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Files in stable path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FromIterator<(String, String)> for FileTree {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

/// Yields repository records for an owner, including private entries when
/// the credentials allow it.
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    async fn list_repositories(&self, owner: &str) -> RepositorySourceResult<RepositoryListing>;
}

/// Materializes the file tree of one repository.
#[async_trait]
pub trait FileTreeProvider: Send + Sync {
    async fn fetch_file_tree(&self, repository: &Repository) -> RepositorySourceResult<FileTree>;
}
