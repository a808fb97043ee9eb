// GitHub API endpoint functions.
// Typed wrappers over the REST endpoints the portfolio reads.

use async_trait::async_trait;

use crate::cache::RepoSource;
use crate::error::Result;

use super::client::GitHubClient;
use super::types::{GitHubRepo, ListReposParams};

impl GitHubClient {
    /// List public repositories owned by `username`.
    ///
    /// A body that is not a repository array is reported as `FolioError::Json`.
    pub async fn list_user_repos(
        &self,
        username: &str,
        params: ListReposParams,
    ) -> Result<Vec<GitHubRepo>> {
        let response = self
            .get_with_params(&format!("/users/{}/repos", username), &params)
            .await?;
        let body = response.text().await?;
        let repos: Vec<GitHubRepo> = serde_json::from_str(&body)?;
        Ok(repos)
    }
}

/// A GitHub user's repository listing, usable as the cache's upstream.
#[derive(Debug, Clone)]
pub struct UserRepos {
    client: GitHubClient,
    username: String,
}

impl UserRepos {
    pub fn new(client: GitHubClient, username: impl Into<String>) -> Self {
        Self {
            client,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

#[async_trait]
impl RepoSource for UserRepos {
    async fn fetch_repos(&self, params: ListReposParams) -> Result<Vec<GitHubRepo>> {
        self.client.list_user_repos(&self.username, params).await
    }
}
