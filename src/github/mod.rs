// GitHub API module.
// Provides the client and types for reading a user's public repositories.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::GitHubClient;
pub use endpoints::UserRepos;
pub use types::*;
