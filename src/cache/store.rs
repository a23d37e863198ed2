//! Cache Store Module
//!
//! Main cache engine: a `HashMap` behind a readers/writer lock, per-entry
//! expiry, and the two-phase sweep the background sweeper runs each tick.
//!
//! Expiration is sweep-only. `get` never re-checks freshness, so a record
//! whose TTL has elapsed stays readable until the next sweep removes it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::SweeperHandle;

// == Store Inner ==
/// State shared between the cache handle and its sweeper task.
#[derive(Debug)]
pub(crate) struct StoreInner<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Mirror of `entries.len()`, written under the write lock
    len: AtomicUsize,
    /// Source of entry generations, bumped under the write lock
    next_generation: AtomicU64,
    /// Performance statistics
    stats: StatsCounters,
}

impl<V: Clone> StoreInner<V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            len: AtomicUsize::new(0),
            next_generation: AtomicU64::new(1),
            stats: StatsCounters::default(),
        }
    }

    fn get(&self, key: &str) -> Result<V> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Ok(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::KeyNotFound(key.to_string()))
            }
        }
    }

    fn set(&self, key: String, value: V, ttl: Duration) {
        let mut entry = CacheEntry::new(value, ttl, Instant::now());

        let mut entries = self.entries.write();
        entry.generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        entries.insert(key, entry);
        self.len.store(entries.len(), Ordering::Release);
    }

    fn delete(&self, key: &str) {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.len.store(entries.len(), Ordering::Release);
        }
    }

    // == Sweep Expired ==
    /// Runs one sweep cycle and returns the number of records evicted.
    ///
    /// An empty store is skipped without touching the lock. Otherwise victims
    /// are collected under the read lock and removed under the write lock.
    pub(crate) fn sweep_expired(&self) -> usize {
        if self.len.load(Ordering::Acquire) == 0 {
            self.stats.record_skipped_sweep();
            trace!("Sweep skipped: store is empty");
            return 0;
        }

        let now = Instant::now();
        let victims = self.collect_expired(now);
        self.stats.record_sweep();

        if victims.is_empty() {
            trace!("Sweep found no expired entries");
            return 0;
        }

        let removed = self.evict(&victims);
        self.stats.record_evictions(removed);
        debug!(
            candidates = victims.len(),
            removed,
            remaining = self.len.load(Ordering::Acquire),
            "Sweep evicted expired entries"
        );
        removed
    }

    /// Returns the keys, with their generations, of records that had expired
    /// as of `now`.
    pub(crate) fn collect_expired(&self, now: Instant) -> Vec<(String, u64)> {
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, entry)| (key.clone(), entry.generation))
            .collect()
    }

    /// Removes each victim whose current record is the one that was scanned.
    ///
    /// Any `set` after the scan installs a new generation, so a refreshed key
    /// survives even if its new TTL has already elapsed.
    pub(crate) fn evict(&self, victims: &[(String, u64)]) -> usize {
        let mut entries = self.entries.write();
        let mut removed = 0;

        for (key, generation) in victims {
            if entries
                .get(key)
                .is_some_and(|entry| entry.generation == *generation)
            {
                entries.remove(key);
                removed += 1;
            }
        }

        self.len.store(entries.len(), Ordering::Release);
        removed
    }
}

// == TTL Cache ==
/// In-process key-value cache with per-entry TTL.
///
/// Each instance owns its store and its own background sweeper. The sweeper
/// stops when the cache is shut down or dropped.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::new(CacheConfig::with_sweep_interval(Duration::from_secs(1)));
/// cache.set("answer", 42, Duration::from_secs(60))?;
/// assert_eq!(cache.get("answer")?, 42);
/// cache.shutdown().await;
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    pub(crate) inner: Arc<StoreInner<V>>,
    sweeper: Option<SweeperHandle>,
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new cache and starts its sweeper unless the config disables it.
    ///
    /// # Panics
    /// Panics if the sweeper is enabled and this is called outside a Tokio
    /// runtime. A cache with the sweeper disabled needs no runtime.
    pub fn new(config: CacheConfig) -> Self {
        let inner = Arc::new(StoreInner::new());
        let sweeper = config
            .effective_sweep_interval()
            .map(|interval| SweeperHandle::spawn(Arc::clone(&inner), interval));

        if sweeper.is_none() {
            debug!("Cache created with sweeper disabled");
        }

        Self { inner, sweeper }
    }

    /// Creates a new cache with the given sweep interval, `None` disabling the sweeper.
    pub fn with_sweep_interval(interval: Option<Duration>) -> Self {
        Self::new(CacheConfig {
            sweep_interval: interval,
        })
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns the value even if its TTL has elapsed, as long as the sweeper
    /// has not removed it yet.
    pub fn get(&self, key: &str) -> Result<V> {
        self.inner.get(key)
    }

    // == Set ==
    /// Stores a value under `key`, replacing any previous record.
    ///
    /// The record expires `ttl` from now. A zero TTL stores a record that the
    /// next sweep will reap. Never fails; the `Result` keeps the surface uniform.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<()> {
        self.inner.set(key.into(), value, ttl);
        Ok(())
    }

    // == Delete ==
    /// Removes the record for `key`. Deleting a missing key is a no-op.
    pub fn delete(&self, key: &str) {
        self.inner.delete(key);
    }

    /// Returns true if `key` currently has a record, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.entries.read().contains_key(key)
    }

    // == TTL ==
    /// Returns the remaining TTL for `key`.
    ///
    /// `Some(Duration::ZERO)` means the record has expired but has not been
    /// swept. `None` means it never expires. A missing key reports the same
    /// `KeyNotFound` error as [`TtlCache::get`].
    pub fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        self.inner
            .entries
            .read()
            .get(key)
            .map(CacheEntry::ttl_remaining)
            .ok_or_else(|| CacheError::KeyNotFound(key.to_string()))
    }

    // == Length ==
    /// Returns the current number of records, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.len.load(Ordering::Acquire)
    }

    // == Is Empty ==
    /// Returns true if the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.len())
    }

    // == Sweep Expired ==
    /// Runs one sweep cycle on the calling thread and returns the number of
    /// records evicted. This is the same pass the sweeper runs each tick.
    pub fn sweep_expired(&self) -> usize {
        self.inner.sweep_expired()
    }

    /// Returns true while the background sweeper task is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(SweeperHandle::is_running)
    }

    // == Shutdown ==
    /// Stops the sweeper and waits for its task to exit.
    ///
    /// Dropping the cache also signals the sweeper, without waiting.
    pub async fn shutdown(mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
    }
}
