//! Cache Configuration
//!
//! The cache is sized by entry count only. [`LruCacheConfig`] has public
//! fields for direct instantiation; the capacity is a `NonZeroUsize`, so a
//! zero-capacity cache cannot be described. When the capacity comes from
//! user input as a plain integer, use [`LruCacheConfig::try_new`], which
//! reports a zero as a [`ConfigError`] instead of panicking.
//!
//! # Sizing
//!
//! Every entry costs one arena slot (the key, the value and two links) plus
//! one hash index bucket (a second copy of the key and a node handle):
//!
//! ```text
//! Total Memory ≈ capacity × (2 × size_of::<K>() + size_of::<V>() + ~48 bytes)
//! ```
//!
//! # Examples
//!
//! ```
//! use lru_arena::config::LruCacheConfig;
//! use lru_arena::LruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = LruCacheConfig {
//!     capacity: NonZeroUsize::new(10_000).unwrap(),
//! };
//! let cache: LruCache<String, Vec<u8>> = LruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 10_000);
//!
//! // Capacity read from somewhere untrusted
//! assert!(LruCacheConfig::try_new(0).is_err());
//! ```

use core::fmt;
use core::num::NonZeroUsize;

use crate::error::ConfigError;

/// Configuration for an LRU (Least Recently Used) cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache holds. Inserting a new
///   key into a full cache evicts the least recently used entry.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LruCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl LruCacheConfig {
    /// Builds a configuration from a raw entry count.
    ///
    /// Returns a [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| ConfigError::new("capacity must be greater than zero"))?;
        Ok(Self { capacity })
    }
}

impl fmt::Debug for LruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl From<NonZeroUsize> for LruCacheConfig {
    fn from(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }
}
