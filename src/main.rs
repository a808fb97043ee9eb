// folio server entry point.
// Parses configuration, installs logging, wires the cache and blog store, and serves.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use folio::blog::MemoryBlogStore;
use folio::cache::{RepoCache, SystemClock};
use folio::config::Config;
use folio::github::{GitHubClient, UserRepos};
use folio::server::{self, AppState, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate().context("invalid configuration")?;

    folio::logging::init(&config.log_level, config.log_format)
        .context("failed to initialize logging")?;

    let client = GitHubClient::with_base_url(&config.github_api, config.github_timeout())
        .context("failed to build GitHub client")?;
    let clock = Arc::new(SystemClock);

    let api = client.base_url().to_string();
    let source = UserRepos::new(client, config.github_user.clone());
    info!(github_user = %source.username(), %api, "showcasing repositories");

    let repos = Arc::new(RepoCache::new(
        Arc::new(source),
        clock.clone(),
        config.cache_ttl(),
        config.max_repos,
    ));
    info!(
        cache_ttl_ms = repos.ttl().as_millis() as u64,
        max_repos = repos.max_results(),
        "starting folio"
    );

    let blog = Arc::new(MemoryBlogStore::new(clock.clone()));
    let sessions = SessionStore::new(clock, config.session_ttl());

    let state = AppState::new(repos, blog, sessions, &config.admin_password);
    server::serve(&config.bind_addr(), state)
        .await
        .context("server terminated")?;

    Ok(())
}
