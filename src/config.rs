// Server configuration.
// Command-line flags with environment fallbacks, validated before startup.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::cache::DEFAULT_MAX_RESULTS;
use crate::error::{FolioError, Result};
use crate::github::client::GITHUB_API_BASE;
use crate::server::DEFAULT_SESSION_TTL;

pub const DEFAULT_GITHUB_USER: &str = "RikoxCode";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Portfolio server with a cached GitHub repository showcase and a minimal blog.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio", version, about)]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, env = "FOLIO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// GitHub user whose repositories are showcased.
    #[arg(long, env = "FOLIO_GITHUB_USER", default_value = DEFAULT_GITHUB_USER)]
    pub github_user: String,

    /// GitHub REST API base URL.
    #[arg(long, env = "FOLIO_GITHUB_API", default_value = GITHUB_API_BASE)]
    pub github_api: String,

    /// Timeout for a single GitHub request, in seconds.
    #[arg(long, env = "FOLIO_GITHUB_TIMEOUT_SECS", default_value_t = 10)]
    pub github_timeout_secs: u64,

    /// How long a successful repository fetch is reused, in milliseconds.
    #[arg(long, env = "FOLIO_CACHE_TTL_MS", default_value_t = 600_000)]
    pub cache_ttl_ms: u64,

    /// Number of repositories shown on the home page.
    #[arg(long, env = "FOLIO_MAX_REPOS", default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_repos: usize,

    /// Shared admin password for blog management.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// How long an admin login stays valid, in seconds.
    #[arg(long, env = "FOLIO_SESSION_TTL_SECS", default_value_t = DEFAULT_SESSION_TTL.as_secs())]
    pub session_ttl_secs: u64,

    /// Default log level when RUST_LOG is unset.
    #[arg(long, env = "FOLIO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "FOLIO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn github_timeout(&self) -> Duration {
        Duration::from_secs(self.github_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.admin_password.is_empty() {
            return Err(FolioError::Config("admin password cannot be empty".to_string()));
        }
        if self.github_user.trim().is_empty() {
            return Err(FolioError::Config("GitHub user cannot be empty".to_string()));
        }
        if self.max_repos == 0 {
            return Err(FolioError::Config("max repos must be at least 1".to_string()));
        }
        if self.github_timeout_secs == 0 {
            return Err(FolioError::Config("GitHub timeout must be positive".to_string()));
        }
        if self.session_ttl_secs == 0 {
            return Err(FolioError::Config("session ttl must be positive".to_string()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(FolioError::Config(format!(
                "invalid log level: {}",
                self.log_level
            )));
        }
        Ok(())
    }
}
