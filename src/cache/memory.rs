//! In-process cache backend.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use super::{Cache, CacheError};

/// A [`Cache`] kept entirely in memory.
///
/// Contents live as long as the value does; share it between routers with an
/// [`Arc`](std::sync::Arc).
///
/// # Examples
///
/// ```
/// use rttp_router::cache::{Cache, MemoryCache};
/// use serde_json::json;
///
/// let cache = MemoryCache::new();
/// cache.set("k", json!(1)).unwrap();
/// assert!(cache.has("k"));
/// assert_eq!(cache.get("k", json!(null)), json!(1));
/// assert_eq!(cache.get("missing", json!([])), json!([]));
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str, default: Value) -> Value {
        self.entries.read().get(key).cloned().unwrap_or(default)
    }

    fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        self.entries.write().insert(key.to_owned(), value);
        Ok(())
    }
}
