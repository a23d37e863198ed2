//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Error returned by cache lookups.
///
/// A key that was never set, was deleted, or was reaped by the sweeper all
/// surface as [`CacheError::KeyNotFound`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key has no live record in the cache
    #[error("key is missing in the cache: {0}")]
    KeyNotFound(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
