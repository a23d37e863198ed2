//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the life of a cache.
//!
//! # Tasks
//! - Sweeper: Removes expired cache entries at the configured interval

mod sweeper;

pub(crate) use sweeper::SweeperHandle;
