//! Route index and its bridge to the external cache.
//!
//! The index owns every compiled route record, keyed by [`RouteId`] and kept in
//! registration order. It talks to the [`Cache`] in three places:
//!
//! 1. **Load** — on construction the whole snapshot is read from the index key.
//! 2. **Write-through** — each new record is stored under its own id.
//! 3. **Flush** — the full snapshot is written back under the index key when it is
//!    not already cached.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheError};

/// Number of digest bytes kept in a [`RouteId`].
const ID_DIGEST_BYTES: usize = 16;

/// Cache key of a single route.
///
/// Derived from the raw template at registration and from the raw request path at
/// lookup: the configured prefix followed by the first 16 bytes of the SHA-256 digest
/// of the string, hex encoded.
///
/// # Examples
///
/// ```
/// use rttp_router::router::RouteId;
///
/// let id = RouteId::derive("r.", "/users");
/// assert!(id.as_str().starts_with("r."));
/// assert_eq!(id.as_str().len(), 2 + 32);
/// assert_eq!(id, RouteId::derive("r.", "/users"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Derives the id of `value` under `prefix`.
    pub fn derive(prefix: &str, value: &str) -> Self {
        let digest = Sha256::digest(value.as_bytes());
        Self(format!("{prefix}{}", hex::encode(&digest[..ID_DIGEST_BYTES])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The persisted record of one registered template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledRoute {
    /// Anchored regex source, flags included.
    pub pattern: String,
    /// Canonical identity used for conflict detection.
    pub identity: String,
    /// The template as registered.
    pub template: String,
    /// Handler identifier, or `None` when the resource lives in the callback registry.
    #[serde(default)]
    pub resource: Option<String>,
}

// Snapshot row: a record together with its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEntry {
    id: RouteId,
    #[serde(flatten)]
    route: CompiledRoute,
}

/// A route record held in memory together with its compiled pattern.
#[derive(Debug, Clone)]
pub struct IndexedRoute {
    pub id: RouteId,
    pub route: CompiledRoute,
    pub regex: Regex,
}

/// The durable `RouteId → CompiledRoute` mapping.
pub struct RouteIndex {
    cache: Arc<dyn Cache>,
    index_key: String,
    entries: Vec<IndexedRoute>,
    positions: HashMap<RouteId, usize>,
    // Whether the snapshot under `index_key` already holds every entry.
    cached: bool,
}

impl RouteIndex {
    /// Loads the snapshot stored under `index_key`.
    ///
    /// The load counts as a cache hit when the key exists and yields at least one
    /// usable entry. An undecodable snapshot, or entries whose pattern no longer
    /// compiles, are logged and dropped; the next [`flush`](Self::flush) then writes a
    /// clean snapshot.
    pub fn load(cache: Arc<dyn Cache>, index_key: &str) -> Self {
        let snapshot: Vec<SnapshotEntry> = match cache.get(index_key, Value::Null) {
            Value::Null => Vec::new(),
            value => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(key = index_key, error = %e, "discarding undecodable route index snapshot");
                Vec::new()
            }),
        };

        let stored = snapshot.len();
        let mut index = Self {
            cache,
            index_key: index_key.to_owned(),
            entries: Vec::with_capacity(stored),
            positions: HashMap::with_capacity(stored),
            cached: false,
        };

        for SnapshotEntry { id, route } in snapshot {
            if index.positions.contains_key(&id) {
                warn!(id = %id, template = %route.template, "skipping duplicate snapshot entry");
                continue;
            }
            match Regex::new(&route.pattern) {
                Ok(regex) => index.push(id, route, regex),
                Err(e) => {
                    warn!(template = %route.template, error = %e, "skipping snapshot entry with unusable pattern");
                }
            }
        }

        index.cached = index.cache.has(index_key)
            && !index.entries.is_empty()
            && index.entries.len() == stored;

        info!(
            key = index_key,
            routes = index.entries.len(),
            hit = index.cached,
            "route index loaded"
        );
        index
    }

    fn push(&mut self, id: RouteId, route: CompiledRoute, regex: Regex) {
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push(IndexedRoute { id, route, regex });
    }

    /// Stores `route` under `id` in the cache, then appends it to the index.
    ///
    /// # Errors
    ///
    /// Returns the cache's error if the write fails; the index is left unchanged.
    pub fn insert(&mut self, id: RouteId, route: CompiledRoute, regex: Regex) -> Result<(), CacheError> {
        self.cache.set(id.as_str(), serde_json::to_value(&route)?)?;
        debug!(id = %id, template = %route.template, "route record written through");

        self.push(id, route, regex);
        self.cached = false;
        Ok(())
    }

    /// Returns the entry stored under `id`.
    pub fn get(&self, id: &RouteId) -> Option<&IndexedRoute> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }

    /// Iterates over entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &IndexedRoute> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the snapshot in the cache is known to hold every entry.
    pub fn is_cached(&self) -> bool {
        self.cached
    }

    /// Writes the full snapshot under the index key unless it is already cached or
    /// there is nothing to write.
    ///
    /// Returns `true` if a snapshot was written.
    ///
    /// # Errors
    ///
    /// Returns the cache's error if the write fails; the snapshot stays uncached.
    pub fn flush(&mut self) -> Result<bool, CacheError> {
        if self.cached || self.entries.is_empty() {
            return Ok(false);
        }

        let snapshot: Vec<SnapshotEntry> = self
            .entries
            .iter()
            .map(|entry| SnapshotEntry {
                id: entry.id.clone(),
                route: entry.route.clone(),
            })
            .collect();
        self.cache.set(&self.index_key, serde_json::to_value(snapshot)?)?;
        self.cached = true;

        info!(key = %self.index_key, routes = self.entries.len(), "route index flushed");
        Ok(true)
    }
}

impl fmt::Debug for RouteIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteIndex")
            .field("index_key", &self.index_key)
            .field("routes", &self.entries.len())
            .field("cached", &self.cached)
            .finish()
    }
}
