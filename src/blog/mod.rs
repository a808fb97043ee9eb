// Blog module.
// Posts and anonymous comments behind an async store.

pub mod store;
pub mod types;

pub use store::{BlogStore, MemoryBlogStore};
pub use types::*;
