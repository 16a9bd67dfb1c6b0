//! Error types for the cache.
//!
//! Lookups never fail: a missing key is reported as `None`. The two error
//! types here cover the remaining cases:
//!
//! - [`ConfigError`]: returned by fallible constructors when a parameter is
//!   invalid (a zero capacity).
//! - [`InvariantError`]: returned by `check_invariants` when the hash index
//!   and the recency list disagree. Seeing one is always a bug.
//!
//! # Example
//!
//! ```
//! use lru_arena::error::ConfigError;
//! use lru_arena::LruCache;
//!
//! let err = LruCache::<String, i32>::try_new(0).unwrap_err();
//! assert!(err.message().contains("capacity"));
//! ```

use std::fmt;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Error returned when an internal invariant of the list or the cache is
/// violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
