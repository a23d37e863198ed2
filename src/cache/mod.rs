//! Cache Module
//!
//! Provides an in-memory key-value cache with per-entry TTL and sweep-only
//! expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use stats::CacheStats;
pub use store::TtlCache;

pub(crate) use entry::CacheEntry;
pub(crate) use store::StoreInner;
