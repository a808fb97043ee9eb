// folio: portfolio server with a cached GitHub repository showcase and a minimal blog.

pub mod blog;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod server;

pub use error::{FolioError, Result};
