// Time-boxed repository cache.
// Memoizes one upstream listing call per window and degrades to empty on failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{FolioError, Result};
use crate::github::{GitHubRepo, ListReposParams, RepoSummary};

use super::clock::Clock;

/// Default cache window: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(600_000);

/// Default number of repositories shown.
pub const DEFAULT_MAX_RESULTS: usize = 8;

/// Upstream repository listing.
#[async_trait]
pub trait RepoSource: Send + Sync {
    async fn fetch_repos(&self, params: ListReposParams) -> Result<Vec<GitHubRepo>>;
}

/// Last successful fetch. Data and timestamp are set together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheEntry {
    #[default]
    Empty,
    Filled {
        data: Vec<RepoSummary>,
        fetched_at: DateTime<Utc>,
    },
}

impl CacheEntry {
    pub fn new(data: Vec<RepoSummary>, fetched_at: DateTime<Utc>) -> Self {
        Self::Filled { data, fetched_at }
    }

    pub fn data(&self) -> Option<&[RepoSummary]> {
        match self {
            Self::Empty => None,
            Self::Filled { data, .. } => Some(data),
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Empty => None,
            Self::Filled { fetched_at, .. } => Some(*fetched_at),
        }
    }

    /// Age of the entry at `now`. An empty entry, or one stamped in the future, is infinitely old.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        match self {
            Self::Empty => Duration::MAX,
            Self::Filled { fetched_at, .. } => now
                .signed_duration_since(*fetched_at)
                .to_std()
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// Result of one cache lookup.
#[derive(Debug)]
pub enum RepoFetch {
    /// Fetched from upstream on this call.
    Fresh(Vec<RepoSummary>),
    /// Served from the cache without I/O.
    Cached(Vec<RepoSummary>),
    /// Upstream failed; `stale` is whatever the cache still holds.
    Failed {
        error: FolioError,
        stale: Option<Vec<RepoSummary>>,
    },
}

impl RepoFetch {
    /// Repositories to show for this call. A failed refresh shows nothing.
    pub fn into_repos(self) -> Vec<RepoSummary> {
        match self {
            Self::Fresh(repos) | Self::Cached(repos) => repos,
            Self::Failed { .. } => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Drop forks, rank by stars (stable for ties), cap, and summarize.
pub fn rank_repos(repos: Vec<GitHubRepo>, max_results: usize) -> Vec<RepoSummary> {
    let mut owned: Vec<GitHubRepo> = repos.into_iter().filter(|r| !r.fork).collect();
    owned.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    owned
        .into_iter()
        .take(max_results)
        .map(RepoSummary::from)
        .collect()
}

/// Process-wide cache of the showcased repositories.
///
/// The lock is held for the freshness check and for the final write only, never
/// across the upstream call, so concurrent misses may each refresh and the last
/// write wins.
pub struct RepoCache {
    source: Arc<dyn RepoSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_results: usize,
    entry: RwLock<CacheEntry>,
}

impl RepoCache {
    pub fn new(
        source: Arc<dyn RepoSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            max_results,
            entry: RwLock::new(CacheEntry::Empty),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Snapshot of the current entry.
    pub async fn entry(&self) -> CacheEntry {
        self.entry.read().await.clone()
    }

    /// Repositories for the home page. Never fails; upstream errors yield an empty list.
    pub async fn get_repos(&self) -> Vec<RepoSummary> {
        self.lookup().await.into_repos()
    }

    /// Serve from cache while fresh, otherwise refresh from upstream.
    pub async fn lookup(&self) -> RepoFetch {
        let now = self.clock.now();

        {
            let entry = self.entry.read().await;
            if entry.is_fresh(now, self.ttl) {
                if let Some(data) = entry.data() {
                    debug!(count = data.len(), "repo cache hit");
                    return RepoFetch::Cached(data.to_vec());
                }
            }
        }

        match self.source.fetch_repos(ListReposParams::default()).await {
            Ok(raw) => {
                let fetched = raw.len();
                let repos = rank_repos(raw, self.max_results);
                info!(fetched, kept = repos.len(), "refreshed repo cache");

                *self.entry.write().await = CacheEntry::new(repos.clone(), now);
                RepoFetch::Fresh(repos)
            }
            Err(error) => {
                warn!(%error, "GitHub API error, serving no repositories");
                let stale = self.entry.read().await.data().map(<[_]>::to_vec);
                RepoFetch::Failed { error, stale }
            }
        }
    }
}
