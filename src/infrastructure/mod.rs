//! Infrastructure Layer - External concerns and implementations

pub mod api_clients;
pub mod repository_source;

pub use api_clients::GitHubClient;
pub use repository_source::{
    FileTree, FileTreeProvider, RepositoryLister, RepositoryListing, RepositorySourceError,
    RepositorySourceResult,
};
