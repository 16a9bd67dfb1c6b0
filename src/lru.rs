//! Least Recently Used (LRU) Cache Implementation
//!
//! This module provides a fixed-capacity, thread-safe LRU cache with O(1)
//! operations. The cache holds at most `capacity` entries; inserting a new key
//! into a full cache evicts the entry that has gone longest without being read
//! or written.
//!
//! # Algorithm
//!
//! Two structures are kept in lock-step:
//!
//! - a [`List`] of `(key, value)` nodes in recency order, front = most
//!   recently used, back = least recently used;
//! - a hash index from key to the [`NodeHandle`] of its node.
//!
//! The list owns every node. The index holds only handles, which stop
//! resolving as soon as their node is removed, so the index can never keep an
//! entry alive or reach a freed one.
//!
//! ```text
//!   index (K -> NodeHandle)        list, front = MRU            back = LRU
//!   ┌─────┬─────┐                  ┌─────────┐   ┌─────────┐   ┌─────────┐
//!   │ "b" │ h_b ├─────────────────▶│ ("b",2) │◄─►│ ("a",1) │◄─►│ ("c",3) │
//!   │ "a" │ h_a ├───────────────────────────────▶└─────────┘   └─────────┘
//!   │ "c" │ h_c ├─────────────────────────────────────────────────▲
//!   └─────┴─────┘
//! ```
//!
//! # Performance Characteristics
//!
//! - Set / Get / Clear bookkeeping: O(1) (hash lookups amortized)
//! - Clear: O(n) to drop the stored entries
//! - Memory: one arena slot plus one index bucket per entry
//!
//! # Thread Safety
//!
//! [`LruCache`] wraps all state in a single `parking_lot::Mutex`. Every public
//! method takes the lock for its whole duration, so no caller can observe the
//! index and the list out of step. The list itself does no locking.

use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::config::LruCacheConfig;
use crate::error::{ConfigError, InvariantError};
use crate::list::{List, NodeHandle};
use crate::metrics::{CacheMetrics, LruCacheMetrics};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

const STALE_HANDLE: &str = "hash index holds a handle to a node that is no longer in the list";

/// Unsynchronized cache state: the recency list, the hash index and metrics.
///
/// [`LruCache`] owns exactly one segment behind its mutex. Every method here
/// assumes the caller has exclusive access.
pub(crate) struct LruSegment<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    list: List<(K, V)>,
    map: HashMap<K, NodeHandle, S>,
    metrics: LruCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> LruSegment<K, V, S> {
    pub(crate) fn init(config: LruCacheConfig, hash_builder: S) -> Self {
        let cap = config.capacity.get();
        LruSegment {
            config,
            list: List::with_capacity(cap),
            map: HashMap::with_capacity_and_hasher(cap, hash_builder),
            metrics: LruCacheMetrics::new(cap as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &LruCacheMetrics {
        &self.metrics
    }

    /// Looks up `key` and, on a hit, promotes its node to the front.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(&node) = self.map.get(key) else {
            self.metrics.core.record_miss();
            return None;
        };
        let promoted = self.list.move_to_front(node);
        assert!(promoted, "{}", STALE_HANDLE);
        self.metrics.core.record_hit();
        self.list.get(node).map(|(_, value)| value)
    }

    /// Looks up `key` without touching recency or metrics.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = *self.map.get(key)?;
        self.list.get(node).map(|(_, value)| value)
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Stores `value` under `key` and makes it the most recently used entry.
    ///
    /// Returns `true` if the key was already present (its value is replaced
    /// in place and occupancy does not change). For a new key in a full
    /// cache, the back node is evicted first, along with its own index entry.
    pub(crate) fn set(&mut self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        if let Some(&node) = self.map.get(&key) {
            let entry = self.list.get_mut(node).expect(STALE_HANDLE);
            entry.1 = value;
            self.list.move_to_front(node);
            self.metrics.core.record_update();
            return true;
        }

        if self.list.len() >= self.cap().get() {
            if let Some(back) = self.list.back() {
                if let Some((evicted_key, _)) = self.list.remove(back) {
                    self.map.remove(&evicted_key);
                    self.metrics.core.record_eviction();
                }
            }
        }

        let node = self.list.push_front((key.clone(), value));
        self.map.insert(key, node);
        self.metrics.core.record_insertion();
        false
    }

    /// Drops every entry. The index and the list are reset together.
    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        self.metrics.core.record_clear();
    }

    /// Keys from most to least recently used.
    pub(crate) fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.list.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Verifies that the index and the list describe the same set of entries.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        let (index_len, list_len) = (self.map.len(), self.list.len());
        if index_len != list_len {
            return Err(InvariantError::new(format!(
                "index has {index_len} keys but list has {list_len} nodes"
            )));
        }
        if list_len > self.cap().get() {
            return Err(InvariantError::new(format!(
                "list holds {list_len} nodes, capacity is {}",
                self.cap()
            )));
        }
        for (key, &node) in self.map.iter() {
            match self.list.get(node) {
                Some((stored, _)) if stored == key => {}
                Some(_) => {
                    return Err(InvariantError::new(
                        "index key maps to a node holding a different key",
                    ))
                }
                None => return Err(InvariantError::new(STALE_HANDLE)),
            }
        }
        Ok(())
    }
}

impl<K, V, S> fmt::Debug for LruSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.list.len())
            .finish()
    }
}

/// A fixed-capacity, thread-safe Least Recently Used (LRU) cache.
///
/// All methods take `&self`; share the cache between threads with an `Arc`
/// (or scoped threads). Each call holds the cache's lock for its whole
/// duration, so every operation is atomic with respect to the others.
///
/// Values are opaque: the cache never compares or inspects them. Methods that
/// hand a value back out of the lock ([`get`](Self::get),
/// [`peek`](Self::peek)) need `V: Clone`; [`get_with`](Self::get_with) works
/// for any `V`.
///
/// # Examples
///
/// ```
/// use lru_arena::LruCache;
/// use core::num::NonZeroUsize;
///
/// let cache = LruCache::new(NonZeroUsize::new(2).unwrap());
///
/// assert!(!cache.set("apple", 1));
/// assert!(!cache.set("banana", 2));
///
/// // Reading "apple" makes "banana" the least recently used entry
/// assert_eq!(cache.get(&"apple"), Some(1));
///
/// cache.set("cherry", 3);
/// assert_eq!(cache.get(&"banana"), None);
/// assert_eq!(cache.get(&"apple"), Some(1));
/// assert_eq!(cache.get(&"cherry"), Some(3));
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    config: LruCacheConfig,
    segment: Mutex<LruSegment<K, V, S>>,
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::init(LruCacheConfig::from(cap), None)
    }

    /// Creates a cache from a raw entry count.
    ///
    /// Returns a [`ConfigError`] if `capacity` is zero.
    ///
    /// ```
    /// use lru_arena::LruCache;
    ///
    /// let cache: LruCache<String, u32> = LruCache::try_new(16).unwrap();
    /// assert_eq!(cache.cap().get(), 16);
    /// assert!(LruCache::<String, u32>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        let config = LruCacheConfig::try_new(capacity)?;
        Ok(Self::init(config, None))
    }

    /// Creates a cache from a configuration with an optional hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration specifying the capacity
    /// * `hasher` - Optional hash builder. If `None`, uses `DefaultHashBuilder`
    pub fn init(config: LruCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a cache holding at most `cap` entries that hashes keys with
    /// `hash_builder`.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self::init_with_hasher(LruCacheConfig::from(cap), hash_builder)
    }

    /// Creates a cache from a configuration and a custom hash builder.
    ///
    /// Use this for deterministic hashing or DoS-resistant hashers.
    pub fn init_with_hasher(config: LruCacheConfig, hash_builder: S) -> Self {
        Self {
            config,
            segment: Mutex::new(LruSegment::init(config, hash_builder)),
        }
    }

    /// Returns the maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Stores `value` under `key` and marks it most recently used.
    ///
    /// Returns `true` if the key already existed; its value is overwritten in
    /// place and nothing is evicted. Returns `false` for a new key; if the
    /// cache was full, the least recently used entry was evicted to make room.
    pub fn set(&self, key: K, value: V) -> bool
    where
        K: Clone,
    {
        self.segment.lock().set(key, value)
    }

    /// Returns a clone of the value stored under `key`, or `None` if absent.
    ///
    /// A hit promotes the entry to most recently used: reads reset the
    /// eviction clock just like writes.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Looks up `key` and applies `f` to the value while holding the lock.
    ///
    /// Promotes the entry exactly like [`get`](Self::get), but does not need
    /// `V: Clone`. Keep `f` short: the whole cache is locked while it runs.
    ///
    /// ```
    /// use lru_arena::LruCache;
    ///
    /// let cache: LruCache<&str, Vec<u8>> = LruCache::try_new(4).unwrap();
    /// cache.set("blob", vec![0; 1024]);
    /// assert_eq!(cache.get_with("blob", |v| v.len()), Some(1024));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Returns a clone of the value under `key` without promoting it.
    ///
    /// Does not count as a request in the metrics.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` is present. Does not promote the entry.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Removes every entry. Capacity is unchanged.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Returns a snapshot of the keys, most recently used first.
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.segment.lock().keys()
    }

    /// Checks that the hash index and the recency list agree.
    ///
    /// Verifies the list links, that index size equals list length, that the
    /// length is within capacity, and that every indexed key maps to a node
    /// storing that same key. An `Err` here always indicates a bug.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> CacheMetrics for LruCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "LRU"
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn make_cache<K: Hash + Eq, V>(cap: usize) -> LruCache<K, V> {
        LruCache::new(NonZeroUsize::new(cap).unwrap())
    }

    #[test]
    fn test_lru_get_set() {
        let cache = make_cache(2);
        assert!(!cache.set("apple", 1));
        assert!(!cache.set("banana", 2));
        assert_eq!(cache.get(&"apple"), Some(1));
        assert_eq!(cache.get(&"banana"), Some(2));
        assert_eq!(cache.get(&"cherry"), None);
        assert!(cache.set("apple", 3));
        assert_eq!(cache.get(&"apple"), Some(3));
        assert!(!cache.set("cherry", 4));
        assert_eq!(cache.get(&"banana"), None);
        assert_eq!(cache.get(&"apple"), Some(3));
        assert_eq!(cache.get(&"cherry"), Some(4));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_recency_ordering() {
        let cache = make_cache(2);
        cache.set("A", 1);
        cache.set("B", 2);
        assert_eq!(cache.get(&"A"), Some(1));
        cache.set("C", 3);
        assert_eq!(cache.get(&"A"), Some(1));
        assert_eq!(cache.get(&"B"), None);
        assert_eq!(cache.get(&"C"), Some(3));
    }

    #[test]
    fn test_lru_update_semantics() {
        let cache = make_cache(3);
        assert!(!cache.set("A", 1));
        assert!(cache.set("A", 2));
        assert_eq!(cache.get(&"A"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_update_promotes() {
        let cache = make_cache(2);
        cache.set("A", 1);
        cache.set("B", 2);
        cache.set("A", 10);
        cache.set("C", 3);
        assert_eq!(cache.get(&"B"), None);
        assert_eq!(cache.get(&"A"), Some(10));
    }

    #[test]
    fn test_lru_eviction_without_access() {
        let cache = make_cache(1);
        cache.set("A", 1);
        cache.set("B", 2);
        assert_eq!(cache.get(&"A"), None);
        assert_eq!(cache.get(&"B"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction_removes_evicted_key_from_index() {
        let cache = make_cache(2);
        cache.set("A", 1);
        cache.set("B", 2);
        cache.set("C", 3);
        assert!(!cache.contains_key(&"A"));
        assert!(cache.contains_key(&"B"));
        assert!(cache.contains_key(&"C"));
        cache.check_invariants().unwrap();

        // The incoming key must be findable right after an eviction.
        cache.set("D", 4);
        assert_eq!(cache.get(&"D"), Some(4));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_clear() {
        let cache = make_cache(2);
        cache.set("apple", 1);
        cache.set("banana", 2);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"apple"), None);
        assert_eq!(cache.get(&"banana"), None);
        cache.check_invariants().unwrap();

        assert!(!cache.set("cherry", 3));
        assert!(!cache.set("date", 4));
        assert_eq!(cache.get(&"cherry"), Some(3));
        assert_eq!(cache.get(&"date"), Some(4));
        assert_eq!(cache.metrics().get("evictions"), Some(&0.0));
    }

    #[test]
    fn test_lru_capacity_limits() {
        let cache = make_cache(2);
        cache.set("apple", 1);
        cache.set("banana", 2);
        cache.set("cherry", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"apple"), None);
        assert_eq!(cache.get(&"banana"), Some(2));
        assert_eq!(cache.get(&"cherry"), Some(3));
    }

    #[test]
    fn test_lru_string_keys() {
        let cache = make_cache(2);
        let key1 = String::from("apple");
        let key2 = String::from("banana");
        cache.set(key1.clone(), 1);
        cache.set(key2.clone(), 2);
        assert_eq!(cache.get(&key1), Some(1));
        assert_eq!(cache.get(&key2), Some(2));
        assert_eq!(cache.get("apple"), Some(1));
        assert_eq!(cache.get("banana"), Some(2));
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct ComplexValue {
        val: i32,
        description: String,
    }

    #[test]
    fn test_lru_complex_values() {
        let cache = make_cache(2);
        let fruit1 = ComplexValue {
            val: 1,
            description: String::from("First fruit"),
        };
        let fruit2 = ComplexValue {
            val: 2,
            description: String::from("Second fruit"),
        };
        cache.set(String::from("apple"), fruit1.clone());
        cache.set(String::from("banana"), fruit2.clone());
        assert_eq!(cache.get("apple"), Some(fruit1));
        assert_eq!(
            cache.get_with("banana", |v| v.description.clone()),
            Some(fruit2.description)
        );
    }

    #[test]
    fn test_get_with_does_not_need_clone() {
        struct Opaque(u32);

        let cache: LruCache<u8, Opaque> = make_cache(2);
        cache.set(1, Opaque(10));
        cache.set(2, Opaque(20));
        assert_eq!(cache.get_with(&1, |v| v.0), Some(10));
        cache.set(3, Opaque(30));
        // Key 1 was promoted by get_with, so key 2 was evicted.
        assert_eq!(cache.get_with(&2, |v| v.0), None);
        assert_eq!(cache.get_with(&1, |v| v.0), Some(10));
    }

    #[test]
    fn test_peek_and_contains_do_not_promote() {
        let cache = make_cache(2);
        cache.set("A", 1);
        cache.set("B", 2);
        assert_eq!(cache.peek(&"A"), Some(1));
        assert!(cache.contains_key(&"A"));
        cache.set("C", 3);
        assert_eq!(cache.peek(&"A"), None);
        assert_eq!(cache.peek(&"B"), Some(2));
    }

    #[test]
    fn test_keys_are_mru_first() {
        let cache = make_cache(3);
        cache.set(1, ());
        cache.set(2, ());
        cache.set(3, ());
        cache.get(&1);
        assert_eq!(cache.keys(), vec![1, 3, 2]);
    }

    #[test]
    fn test_try_new_rejects_zero() {
        assert!(LruCache::<String, i32>::try_new(0).is_err());
        let cache = LruCache::<String, i32>::try_new(5).unwrap();
        assert_eq!(cache.cap().get(), 5);
    }

    #[test]
    fn test_with_hasher() {
        let cache: LruCache<&str, i32, _> =
            LruCache::with_hasher(NonZeroUsize::new(2).unwrap(), DefaultHashBuilder::default());
        cache.set("test", 42);
        assert_eq!(cache.get(&"test"), Some(42));
    }

    #[test]
    fn test_lru_metrics() {
        let cache = make_cache(2);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_hits").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &0.0);
        cache.set("apple", 1);
        cache.set("banana", 2);
        cache.get(&"apple");
        cache.get(&"banana");
        cache.get(&"missing");
        cache.set("apple", 5);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits").unwrap(), &2.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &1.0);
        assert_eq!(metrics.get("requests").unwrap(), &3.0);
        assert_eq!(metrics.get("insertions").unwrap(), &2.0);
        assert_eq!(metrics.get("updates").unwrap(), &1.0);
        cache.set("cherry", 3);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("evictions").unwrap(), &1.0);
        assert_eq!(metrics.get("len").unwrap(), &2.0);
        cache.clear();
        let metrics = cache.metrics();
        assert_eq!(metrics.get("clears").unwrap(), &1.0);
        assert_eq!(metrics.get("len").unwrap(), &0.0);
        assert_eq!(cache.algorithm_name(), "LRU");
    }

    #[test]
    fn test_debug_output() {
        let cache = make_cache::<&str, i32>(4);
        cache.set("a", 1);
        assert_eq!(format!("{cache:?}"), "LruCache { capacity: 4, len: 1 }");
    }

    #[test]
    fn test_lru_segment_directly() {
        let config = LruCacheConfig::try_new(2).unwrap();
        let mut segment: LruSegment<&str, i32> =
            LruSegment::init(config, DefaultHashBuilder::default());
        assert_eq!(segment.len(), 0);
        assert!(segment.is_empty());
        assert_eq!(segment.cap().get(), 2);
        segment.set("a", 1);
        segment.set("b", 2);
        assert_eq!(segment.len(), 2);
        assert_eq!(segment.get(&"a"), Some(&1));
        assert_eq!(segment.get(&"b"), Some(&2));
        assert_eq!(segment.keys(), vec!["b", "a"]);
        segment.check_invariants().unwrap();
    }

    #[test]
    fn test_check_invariants_detects_index_drift() {
        let config = LruCacheConfig::try_new(3).unwrap();
        let mut segment: LruSegment<&str, i32> =
            LruSegment::init(config, DefaultHashBuilder::default());
        segment.set("a", 1);
        segment.set("b", 2);

        // Reset only the index, leaving the list populated.
        segment.map.clear();
        let err = segment.check_invariants().unwrap_err();
        assert!(err.message().contains("index has 0 keys"));
    }

    #[test]
    fn test_lru_concurrent_access() {
        let cache: Arc<LruCache<String, usize>> = Arc::new(make_cache(100));
        let num_threads = 4;
        let ops_per_thread = 100;

        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

        // Spawn writer threads
        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread_{}_key_{}", t, i);
                    cache.set(key, t * 1000 + i);
                }
            }));
        }

        // Spawn reader threads
        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("thread_{}_key_{}", t, i);
                    let _ = cache.get(&key);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
        assert!(!cache.is_empty());
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_lru_concurrent_mixed_operations() {
        let cache: Arc<LruCache<String, usize>> = Arc::new(make_cache(100));
        let num_threads = 8;
        let ops_per_thread = 1000;

        let mut handles: Vec<thread::JoinHandle<()>> = Vec::new();

        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = format!("key_{}", i % 200);

                    match i % 3 {
                        0 => {
                            cache.set(key, i);
                        }
                        1 => {
                            let _ = cache.get(&key);
                        }
                        2 => {
                            let _ = cache.get_with(&key, |v| *v + 1);
                        }
                        _ => unreachable!(),
                    }

                    if i == 500 && t == 0 {
                        cache.clear();
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 100);
        cache.check_invariants().unwrap();
    }
}
