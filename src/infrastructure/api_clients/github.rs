//! GitHub REST API client
//!
//! Implements both repository source traits against api.github.com: the
//! paginated repository listing (private repositories included when the
//! token's user matches the requested owner) and bounded file tree fetches
//! through the git trees and contents endpoints.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::application::rules;
use crate::config::{AnalysisConfig, GithubConfig};
use crate::domain::Repository;
use crate::infrastructure::repository_source::{
    FileTree, FileTreeProvider, RepositoryLister, RepositoryListing, RepositorySourceError,
    RepositorySourceResult,
};

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("repolens/", env!("CARGO_PKG_VERSION"));

/// Source file extensions worth pulling for the text pattern scan
const SCANNABLE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "rb", "go", "rs",
];

#[derive(Debug, Deserialize)]
struct RepoDto {
    id: i64,
    name: String,
    full_name: String,
    html_url: String,
    description: Option<String>,
    private: bool,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    pushed_at: Option<DateTime<Utc>>,
    default_branch: Option<String>,
    owner: OwnerDto,
}

#[derive(Debug, Deserialize)]
struct OwnerDto {
    login: String,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    login: String,
}

#[derive(Debug, Deserialize)]
struct TreeDto {
    tree: Vec<TreeEntryDto>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntryDto {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ContentDto {
    content: Option<String>,
    #[serde(default)]
    encoding: String,
}

/// GitHub REST v3 client
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    page_size: u32,
    max_repositories: usize,
    max_concurrent_file_fetches: usize,
    max_files_scanned: usize,
    max_single_file_bytes: u64,
}

impl GitHubClient {
    pub fn new(
        github: &GithubConfig,
        analysis: &AnalysisConfig,
    ) -> RepositorySourceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(github.timeout_seconds))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: github.base_url.trim_end_matches('/').to_string(),
            token: github.token.clone(),
            page_size: github.page_size,
            max_repositories: github.max_repositories,
            max_concurrent_file_fetches: github.max_concurrent_file_fetches,
            max_files_scanned: analysis.max_files_scanned,
            max_single_file_bytes: analysis.max_single_file_bytes,
        })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url).header("Accept", ACCEPT_HEADER);
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("token {}", token));
        }
        builder
    }

    /// Map non-success statuses, recognizing exhausted rate limits.
    async fn check_status(response: Response) -> RepositorySourceResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let message = response.text().await.unwrap_or_default();

        if status == StatusCode::FORBIDDEN && remaining.as_deref() == Some("0") {
            return Err(RepositorySourceError::RateLimited {
                retry_after,
                message,
            });
        }

        Err(RepositorySourceError::Http {
            status: status.as_u16(),
            message,
        })
    }

    /// Login of the authenticated user, if a valid token is configured.
    async fn authenticated_login(&self) -> Option<String> {
        if self.token.is_none() {
            return None;
        }
        let url = format!("{}/user", self.base_url);
        match self.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<UserDto>().await.ok().map(|u| u.login)
            }
            Ok(response) => {
                warn!(
                    status = response.status().as_u16(),
                    "Could not verify authenticated user; listing public repositories only"
                );
                None
            }
            Err(e) => {
                warn!("Could not verify authenticated user: {e}");
                None
            }
        }
    }

    async fn fetch_repository_page(
        &self,
        owner: &str,
        page: u32,
        own_repos: bool,
    ) -> RepositorySourceResult<Vec<RepoDto>> {
        // /user/repos sees private repositories; /users/{owner}/repos is public only
        let (url, extra): (String, &[(&str, &str)]) = if own_repos {
            (
                format!("{}/user/repos", self.base_url),
                &[("affiliation", "owner,collaborator,organization_member")],
            )
        } else {
            (
                format!("{}/users/{}/repos", self.base_url, owner),
                &[("type", "all")],
            )
        };

        let page_str = page.to_string();
        let per_page_str = self.page_size.to_string();
        let mut params = vec![
            ("per_page", per_page_str.as_str()),
            ("page", page_str.as_str()),
            ("sort", "updated"),
            ("direction", "desc"),
        ];
        params.extend_from_slice(extra);

        let response = self.get(&url).query(&params).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Pick which tree entries to materialize: well-known marker/manifest
    /// files first, then scannable source files, bounded by count and size.
    fn select_paths(&self, tree: &TreeDto) -> Vec<String> {
        let mut well_known = Vec::new();
        let mut sources = Vec::new();

        for entry in &tree.tree {
            if entry.entry_type != "blob" {
                continue;
            }
            if entry.size.unwrap_or(0) > self.max_single_file_bytes {
                continue;
            }
            if is_well_known(&entry.path) {
                well_known.push(entry.path.clone());
            } else if is_scannable_source(&entry.path) {
                sources.push(entry.path.clone());
            }
        }

        sources.sort();
        well_known.extend(sources);
        well_known.truncate(self.max_files_scanned);
        well_known
    }
}

/// Root-level files the signal extractor keys on.
fn is_well_known(path: &str) -> bool {
    path == rules::NVMRC_FILE || rules::marker_paths().any(|marker| marker == path)
}

/// Source files worth scanning for text patterns.
fn is_scannable_source(path: &str) -> bool {
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    if file_name.starts_with(".env") {
        return true;
    }
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| SCANNABLE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

#[async_trait]
impl RepositoryLister for GitHubClient {
    async fn list_repositories(&self, owner: &str) -> RepositorySourceResult<RepositoryListing> {
        let login = self.authenticated_login().await;
        let own_repos = login
            .as_deref()
            .is_some_and(|login| login.eq_ignore_ascii_case(owner));

        let mut dtos: Vec<RepoDto> = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.fetch_repository_page(owner, page, own_repos).await?;
            if batch.is_empty() {
                break;
            }
            let batch_len = batch.len();
            // /user/repos also lists repositories of other owners
            dtos.extend(
                batch
                    .into_iter()
                    .filter(|dto| !own_repos || dto.owner.login.eq_ignore_ascii_case(owner)),
            );
            if dtos.len() >= self.max_repositories || batch_len < self.page_size as usize {
                break;
            }
            page += 1;
        }
        dtos.truncate(self.max_repositories);

        // Languages per repository, bounded concurrency, listing order kept
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.max_concurrent_file_fetches,
        ));
        let mut join_set: JoinSet<(usize, BTreeMap<String, u64>)> = JoinSet::new();
        for (index, dto) in dtos.iter().enumerate() {
            let full_name = dto.full_name.clone();
            let url = format!("{}/repos/{}/languages", self.base_url, full_name);
            let request = self.get(&url);
            let permit = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = match permit.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, BTreeMap::new()),
                };
                let languages = async {
                    let response = request.send().await?;
                    let response = GitHubClient::check_status(response).await?;
                    Ok::<_, RepositorySourceError>(response.json::<BTreeMap<String, u64>>().await?)
                }
                .await;
                match languages {
                    Ok(languages) => (index, languages),
                    Err(e) => {
                        warn!(repository = %full_name, "Failed to fetch languages: {e}");
                        (index, BTreeMap::new())
                    }
                }
            });
        }

        let mut languages_by_index: Vec<BTreeMap<String, u64>> =
            vec![BTreeMap::new(); dtos.len()];
        while let Some(joined) = join_set.join_next().await {
            if let Ok((index, languages)) = joined {
                languages_by_index[index] = languages;
            }
        }

        let repositories = dtos
            .into_iter()
            .zip(languages_by_index)
            .map(|(dto, languages)| Repository {
                id: dto.id,
                name: dto.name,
                full_name: dto.full_name,
                url: dto.html_url,
                description: dto.description,
                is_private: dto.private,
                created_at: dto.created_at,
                updated_at: dto.updated_at,
                pushed_at: dto.pushed_at,
                languages,
                default_branch: dto.default_branch.unwrap_or_else(|| "main".to_string()),
            })
            .collect();

        Ok(RepositoryListing::new(repositories))
    }
}

#[async_trait]
impl FileTreeProvider for GitHubClient {
    async fn fetch_file_tree(&self, repository: &Repository) -> RepositorySourceResult<FileTree> {
        let url = format!(
            "{}/repos/{}/git/trees/{}",
            self.base_url, repository.full_name, repository.default_branch
        );
        let response = self.get(&url).query(&[("recursive", "1")]).send().await?;

        // Empty repositories answer 409 (404 for a missing branch); both mean
        // "nothing to scan", not "unavailable"
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::CONFLICT
        ) {
            debug!(repository = %repository.full_name, "No file tree (empty repository)");
            return Ok(FileTree::new());
        }
        let response = Self::check_status(response).await?;
        let tree: TreeDto = response.json().await?;
        if tree.truncated {
            debug!(repository = %repository.full_name, "Tree listing truncated by GitHub");
        }

        let paths = self.select_paths(&tree);
        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.max_concurrent_file_fetches,
        ));
        let mut join_set: JoinSet<Option<(String, String)>> = JoinSet::new();

        for path in paths {
            let permit = Arc::clone(&semaphore);
            let full_name = repository.full_name.clone();
            let branch = repository.default_branch.clone();
            let url = format!(
                "{}/repos/{}/contents/{}",
                self.base_url, full_name, path
            );
            let request = self.get(&url).query(&[("ref", branch.as_str())]);
            join_set.spawn(async move {
                let _permit = permit.acquire().await.ok()?;
                let content = async {
                    let response = request.send().await?;
                    let response = GitHubClient::check_status(response).await?;
                    let dto: ContentDto = response.json().await?;
                    decode_content(&path, dto)
                }
                .await;
                match content {
                    Ok(content) => Some((path, content)),
                    Err(e) => {
                        // A single unreadable file degrades, it does not abort the tree
                        warn!(repository = %full_name, path, "Failed to fetch file: {e}");
                        None
                    }
                }
            });
        }

        let mut file_tree = FileTree::new();
        while let Some(joined) = join_set.join_next().await {
            if let Ok(Some((path, content))) = joined {
                file_tree.insert(path, content);
            }
        }
        Ok(file_tree)
    }
}

fn decode_content(path: &str, dto: ContentDto) -> RepositorySourceResult<String> {
    let Some(raw) = dto.content else {
        return Err(RepositorySourceError::Decode {
            path: path.to_string(),
            message: "no inline content returned".to_string(),
        });
    };
    if !dto.encoding.is_empty() && dto.encoding != "base64" {
        return Err(RepositorySourceError::Decode {
            path: path.to_string(),
            message: format!("unsupported encoding '{}'", dto.encoding),
        });
    }
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(stripped)
        .map_err(|e| RepositorySourceError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
