// Cache module for the repository showcase.
// Holds the in-process repository cache and its time source.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{
    CacheEntry, DEFAULT_MAX_RESULTS, DEFAULT_TTL, RepoCache, RepoFetch, RepoSource, rank_repos,
};
