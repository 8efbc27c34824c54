//! Key/value cache the router persists its route index through.
//!
//! The router only needs three operations, mirrored by the [`Cache`] trait:
//! `get(key, default)`, `has(key)` and `set(key, value)`. Values are
//! [`serde_json::Value`] documents so any backend that can store JSON can host a route
//! index.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryCache`] — process-local map, useful for tests and single-process apps.
//! - [`FileCache`] — JSON document on disk that survives restarts.
//!
//! Backends take `&self` and must be `Send + Sync`: several routers (one per worker,
//! say) may share one cache, so the backend is responsible for its own locking.

use serde_json::Value;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

/// Errors produced by cache backends.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A synchronous key/value store for JSON values.
pub trait Cache: Send + Sync {
    /// Returns the value stored under `key`, or `default` if there is none.
    fn get(&self, key: &str, default: Value) -> Value;

    /// Returns `true` if a value is stored under `key`.
    fn has(&self, key: &str) -> bool;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Backend-specific; see [`CacheError`].
    fn set(&self, key: &str, value: Value) -> Result<(), CacheError>;
}
