use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to access cache entry {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Entry exists but is not a list of options in any known shape.
    #[error("Malformed cache entry {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A persistent string key-value store, one entry per category.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Stores each entry as a JSON file in a cache directory.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&cache_dir).map_err(|source| CacheError::Io {
            key: cache_dir.display().to_string(),
            source,
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    /// Keys look like `@select_options:areas`; keep file names portable.
    fn cache_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .trim_start_matches('@')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(format!("{}.json", name))
    }
}

fn io_error(key: &str, source: std::io::Error) -> CacheError {
    CacheError::Io {
        key: key.to_string(),
        source,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.cache_path(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.cache_path(key);
        // Write then rename so a crash never leaves half an entry behind
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| io_error(key, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| io_error(key, e))?;
        debug!(key, path = %path.display(), "Cache entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        match tokio::fs::remove_file(self.cache_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// Process-local store, for tests and sessions that must not touch disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, e.g. with a legacy payload.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.put(key, value);
        self
    }

    fn put(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }

    /// Raw entry, bypassing the async interface.
    pub fn snapshot(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.snapshot(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.put(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cache")).unwrap();

        assert_eq!(store.get("@select_options:areas").await.unwrap(), None);

        store.set("@select_options:areas", r#"[{"label":"東京"}]"#).await.unwrap();
        assert_eq!(
            store.get("@select_options:areas").await.unwrap().as_deref(),
            Some(r#"[{"label":"東京"}]"#)
        );
        assert!(dir.path().join("cache").join("select_options_areas.json").exists());

        store.remove("@select_options:areas").await.unwrap();
        assert_eq!(store.get("@select_options:areas").await.unwrap(), None);
        // Removing twice is fine
        store.remove("@select_options:areas").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        store.set("@select_options:status", "a").await.unwrap();
        store.set("@stay_select_options:status", "b").await.unwrap();

        assert_eq!(store.get("@select_options:status").await.unwrap().as_deref(), Some("a"));
        assert_eq!(store.get("@stay_select_options:status").await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new().with_entry("k", "v");
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        store.set("k", "w").await.unwrap();
        assert_eq!(store.snapshot("k").as_deref(), Some("w"));
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }
}
