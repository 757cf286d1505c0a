//! Local caching module for offline vocabulary access.
//!
//! This module provides the `KeyValueStore` abstraction the option store
//! persists through, with two backends:
//! - `FileStore`: one JSON file per category under the cache directory
//! - `MemoryStore`: process-local, for tests and ephemeral sessions
//!
//! Values are JSON-encoded option lists. The cache is a replica of the
//! remote service, never a queue of pending writes.

pub mod manager;

pub use manager::{CacheError, FileStore, KeyValueStore, MemoryStore};
