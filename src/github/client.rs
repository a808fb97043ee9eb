// GitHub API HTTP client.
// Sends unauthenticated REST requests and converts non-success statuses into errors.

use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FolioError, Result};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Default timeout for a single outbound request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub API client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE, DEFAULT_TIMEOUT)
    }

    /// Create a client against an arbitrary API base (GitHub Enterprise, test servers).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("folio/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(FolioError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: serde::Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(FolioError::Api)?;

        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(FolioError::NotFound(response.url().to_string()));
    }

    Err(FolioError::Status {
        status,
        body: response.text().await.unwrap_or_default(),
    })
}
