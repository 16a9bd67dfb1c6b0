#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         LruCache<K, V, S>                        │
//! │                                                                  │
//! │   parking_lot::Mutex  (one per cache, held for every call)       │
//! │   ┌──────────────────────────────────────────────────────────┐   │
//! │   │                     LruSegment                           │   │
//! │   │                                                          │   │
//! │   │   HashMap<K, NodeHandle>        List<(K, V)>             │   │
//! │   │   ┌───────────────┐             ┌──────────────────────┐ │   │
//! │   │   │ key ─► handle ├────────────▶│ SlotArena<Node>      │ │   │
//! │   │   └───────────────┘  non-owning │ head ◄─► ... ◄─► tail│ │   │
//! │   │                                 └──────────────────────┘ │   │
//! │   │   LruCacheMetrics                                        │   │
//! │   └──────────────────────────────────────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use lru_arena::LruCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache: Arc<LruCache<String, u64>> = Arc::new(LruCache::try_new(1_000).unwrap());
//!
//! let handles: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..500 {
//!                 let key = format!("key-{}-{}", t, i);
//!                 cache.set(key.clone(), i);
//!                 let _ = cache.get(&key);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for h in handles {
//!     h.join().unwrap();
//! }
//!
//! assert!(cache.len() <= 1_000);
//! assert!(cache.check_invariants().is_ok());
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: The cache itself
//! - [`list`]: Arena-backed recency list used by the cache
//! - [`arena`]: Slot storage with generation-checked ids
//! - [`config`]: Cache configuration
//! - [`error`]: Configuration and invariant errors
//! - [`metrics`]: Hit/miss/eviction counters

/// Slot arena with free-list reuse.
///
/// Node storage for [`list::List`]. Ids carry a generation, so an id whose
/// value was removed never resolves again.
pub mod arena;

/// Doubly linked recency list whose nodes live in a slot arena.
///
/// Front is the most recently used node, back the least recently used.
/// Handles are scoped to the list that issued them.
pub mod list;

/// Cache configuration structures.
pub mod config;

/// Error types.
pub mod error;

/// Least Recently Used (LRU) cache implementation.
///
/// Provides a fixed-size, thread-safe cache that evicts the least recently
/// used entry when the capacity is reached.
pub mod lru;

/// Cache metrics system.
///
/// Counters for requests, hits, insertions, updates, evictions and clears,
/// reported through the [`metrics::CacheMetrics`] trait.
pub mod metrics;

pub use config::LruCacheConfig;
pub use error::{ConfigError, InvariantError};
pub use lru::LruCache;
pub use metrics::CacheMetrics;
