//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry: a value and its absolute expiry.
///
/// Value and expiry are always written together, so a reader holding the
/// store lock never sees one without the other.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = the TTL overflowed the clock and the entry never expires
    pub expires_at: Option<Instant>,
    /// Write sequence number assigned by the store on insert
    pub(crate) generation: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` after `now`.
    ///
    /// A zero TTL yields an entry that is already due for the next sweep.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
            generation: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry had expired as of `now`.
    ///
    /// Boundary condition: an entry is expired only when its expiry instant is
    /// strictly before `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => expires < now,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL, `Some(Duration::ZERO)` once expired, or
    /// None if the entry never expires.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_with_ttl() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60), Instant::now());

        assert_eq!(entry.value, "test_value");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value", Duration::from_millis(20), Instant::now());

        assert!(!entry.is_expired_at(Instant::now()));

        sleep(Duration::from_millis(40));

        assert!(entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_zero_ttl_expires_after_insertion_instant() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, Duration::ZERO, now);

        // Not strictly before the insertion instant itself
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + Duration::from_nanos(1)));
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let entry = CacheEntry::new((), Duration::MAX, Instant::now());

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(Instant::now()));
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new("v", Duration::from_secs(10), Instant::now());

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = CacheEntry::new("v", Duration::from_millis(10), Instant::now());

        sleep(Duration::from_millis(30));

        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }
}
