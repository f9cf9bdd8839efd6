pub mod alias;
pub mod cache;
pub mod client;
pub mod encoding;
pub mod error;
pub mod variant;

pub use alias::{AliasTable, LawAlias};
pub use cache::FileCache;
pub use client::{Acquired, LawFetcher, Payload, DEFAULT_BASE_URL};
pub use error::{FetchError, Result};
