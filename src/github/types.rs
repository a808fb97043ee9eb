// GitHub API response types.
// Raw repository records from the REST API and the summaries shown on the home page.

use serde::{Deserialize, Serialize};

/// Placeholder shown when a repository has no description.
pub const NO_DESCRIPTION: &str = "No description available";

/// Repository record as returned by `GET /users/{user}/repos`.
///
/// Only the fields the portfolio needs are decoded; the rest of the payload is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    pub description: Option<String>,
    pub language: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
}

/// Sort order accepted by the repository listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoSort {
    Created,
    #[default]
    Updated,
    Pushed,
    FullName,
}

/// Query parameters for a repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListReposParams {
    pub sort: RepoSort,
    pub per_page: u32,
}

impl Default for ListReposParams {
    fn default() -> Self {
        Self {
            sort: RepoSort::Updated,
            per_page: 100,
        }
    }
}

/// Repository summary handed to the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: String,
    pub stars: u64,
    pub language: Option<String>,
    pub url: String,
    pub topics: Vec<String>,
}

impl From<GitHubRepo> for RepoSummary {
    fn from(repo: GitHubRepo) -> Self {
        let description = repo
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Self {
            name: repo.name,
            description,
            stars: repo.stargazers_count,
            language: repo.language,
            url: repo.html_url,
            topics: repo.topics.unwrap_or_default(),
        }
    }
}
