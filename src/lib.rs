//! Microcache - An embeddable in-process TTL cache
//!
//! Stores values of any cloneable type under string keys, each with its own
//! time-to-live. A per-instance background sweeper reclaims expired entries;
//! reads never re-check freshness.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{CacheStats, TtlCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
