//! JSON-file cache backend.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{Cache, CacheError};

/// A [`Cache`] persisted as a single JSON object on disk.
///
/// The file is read once by [`FileCache::open`] and mirrored in memory; every
/// [`set`](Cache::set) rewrites it through a temporary sibling file followed by a
/// rename, so readers never see a half-written document. The in-memory copy only
/// changes once the file write succeeds.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl FileCache {
    /// Opens the cache stored at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Io`] if the file exists but cannot be read.
    /// - [`CacheError::Serialization`] if it is not a JSON object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, Value> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = entries.len(), "file cache opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Write the whole map next to the target, then move it into place.
    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str, default: Value) -> Value {
        self.entries.read().get(key).cloned().unwrap_or(default)
    }

    fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        updated.insert(key.to_owned(), value);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
