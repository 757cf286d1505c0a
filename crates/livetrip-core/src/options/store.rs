//! Remote-authoritative option lists with a local replica.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::api::RemoteOptions;
use crate::cache::{CacheError, KeyValueStore};
use crate::error::Result;
use crate::models::{Category, ColorCode, Dimension, SelectOption};

use super::color::ColorResolver;
use super::editor;
use super::migrate::{migrate, parse, seed, Migration};
use super::ordering::{apply, RankMaps, SortMode};

/// Reads and writes vocabularies for one session.
///
/// Reads prefer the remote service and fall back to the local cache, then
/// to seeded defaults. Writes go to the remote first; the local cache only
/// ever holds lists the remote has acknowledged.
pub struct OptionStore {
    remote: Arc<dyn RemoteOptions>,
    local: Arc<dyn KeyValueStore>,
    /// Last list read from or written to `local`, per category.
    mirror: Mutex<HashMap<Category, Vec<SelectOption>>>,
    resolver: ColorResolver,
}

impl OptionStore {
    pub fn new(remote: Arc<dyn RemoteOptions>, local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            remote,
            local,
            mirror: Mutex::new(HashMap::new()),
            resolver: ColorResolver::new(),
        }
    }

    pub fn resolver(&self) -> &ColorResolver {
        &self.resolver
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current list for `category`. Never fails: remote and cache problems
    /// are logged and the next source is tried.
    pub async fn read(&self, category: Category) -> Vec<SelectOption> {
        match self.remote.fetch_options(category).await {
            Ok(options) if !options.is_empty() => {
                if let Err(e) = self.store_local(category, &options).await {
                    warn!(%category, error = %e, "Failed to cache remote options");
                }
                return options;
            }
            Ok(_) => debug!(%category, "Remote has no options, trying local cache"),
            Err(e) => warn!(%category, error = %e, "Remote fetch failed, trying local cache"),
        }

        if let Some(options) = self.read_local(category).await {
            if !options.is_empty() {
                debug!(%category, count = options.len(), "Using cached options");
                return options;
            }
        }

        debug!(%category, "No stored options, using defaults");
        seed(category)
    }

    /// Read several categories concurrently, in request order.
    pub async fn read_many(&self, categories: &[Category]) -> Vec<(Category, Vec<SelectOption>)> {
        let lists = join_all(categories.iter().map(|c| self.read(*c))).await;
        categories.iter().copied().zip(lists).collect()
    }

    /// Rank maps for every groupable dimension. Categories missing from
    /// `modes` use custom order.
    pub async fn load_rank_maps(&self, modes: &HashMap<Category, SortMode>) -> RankMaps {
        let mut categories: Vec<Category> = Dimension::ALL.iter().filter_map(|d| d.category()).collect();
        categories.sort();
        categories.dedup();

        let lists = self.read_many(&categories).await;
        RankMaps::from_lists(&lists, modes)
    }

    /// Color of `label`, reading the category only if it has not been
    /// resolved before.
    pub async fn color_for(&self, label: &str, category: Category) -> ColorCode {
        if self.resolver.is_cached(category, label) {
            return self.resolver.resolve_cached(label, category);
        }
        let options = self.read(category).await;
        self.resolver.resolve_in(label, category, &options)
    }

    /// Colors for a screen's worth of labels, in input order.
    pub async fn colors_by_label(&self, labels: &[&str], category: Category) -> IndexMap<String, ColorCode> {
        let options = if labels.iter().all(|l| self.resolver.is_cached(category, l)) {
            Vec::new()
        } else {
            self.read(category).await
        };
        labels
            .iter()
            .map(|label| (label.to_string(), self.resolver.resolve_in(label, category, &options)))
            .collect()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Commit `options` in custom order.
    pub async fn write(&self, category: Category, options: &[SelectOption]) -> Result<Vec<SelectOption>> {
        self.write_with_mode(category, options, SortMode::Custom).await
    }

    /// Commit `options` to the remote, then replace the local copy.
    ///
    /// On remote failure the error is returned and the local cache keeps
    /// its previous contents.
    pub async fn write_with_mode(
        &self,
        category: Category,
        options: &[SelectOption],
        mode: SortMode,
    ) -> Result<Vec<SelectOption>> {
        if let Err(e) = self.remote.save_options(category, options, mode).await {
            debug!(%category, error = %e, "Remote rejected options");
            return Err(e.into());
        }

        self.resolver.remember(category, options);
        // The remote already has the list; a stale replica is refreshed on
        // the next successful read
        if let Err(e) = self.store_local(category, options).await {
            warn!(%category, error = %e, "Failed to cache committed options");
        }
        debug!(%category, count = options.len(), %mode, "Options committed");
        Ok(options.to_vec())
    }

    /// Current list in display order, as the editor indexes it.
    async fn editable(&self, category: Category) -> Vec<SelectOption> {
        apply(&self.read(category).await, SortMode::Custom)
    }

    pub async fn add_option(
        &self,
        category: Category,
        label: &str,
        color: Option<ColorCode>,
    ) -> Result<Vec<SelectOption>> {
        let updated = editor::add(category, &self.editable(category).await, label, color)?;
        self.write(category, &updated).await
    }

    pub async fn update_option(
        &self,
        category: Category,
        index: usize,
        label: &str,
        color: Option<ColorCode>,
    ) -> Result<Vec<SelectOption>> {
        let updated = editor::update(&self.editable(category).await, index, label, color)?;
        self.write(category, &updated).await
    }

    pub async fn move_option(&self, category: Category, from: usize, to: usize) -> Result<Vec<SelectOption>> {
        let updated = editor::move_to(&self.editable(category).await, from, to)?;
        self.write(category, &updated).await
    }

    pub async fn delete_option(&self, category: Category, label: &str) -> Result<Vec<SelectOption>> {
        let updated = editor::delete(category, &self.editable(category).await, label)?;
        self.write(category, &updated).await
    }

    // ========================================================================
    // Local replica
    // ========================================================================

    fn mirrored(&self, category: Category) -> Option<Vec<SelectOption>> {
        let mirror = self.mirror.lock().unwrap_or_else(|e| e.into_inner());
        mirror.get(&category).cloned()
    }

    fn set_mirror(&self, category: Category, options: &[SelectOption]) {
        let mut mirror = self.mirror.lock().unwrap_or_else(|e| e.into_inner());
        mirror.insert(category, options.to_vec());
    }

    async fn store_local(&self, category: Category, options: &[SelectOption]) -> std::result::Result<(), CacheError> {
        let encoded = serde_json::to_string(options)?;
        self.local.set(&category.storage_key(), &encoded).await?;
        self.set_mirror(category, options);
        Ok(())
    }

    /// Cached list, migrated. Corrupt entries are removed and read as a miss.
    async fn read_local(&self, category: Category) -> Option<Vec<SelectOption>> {
        if let Some(options) = self.mirrored(category) {
            return Some(options);
        }

        let key = category.storage_key();
        let raw = match self.local.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%category, error = %e, "Failed to read cached options");
                return None;
            }
        };

        let entries = match parse(&key, &raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%category, error = %e, "Discarding malformed cache entry");
                if let Err(e) = self.local.remove(&key).await {
                    warn!(%category, error = %e, "Failed to remove malformed cache entry");
                }
                return None;
            }
        };

        let Migration { options, changed } = migrate(category, entries);
        if changed && !options.is_empty() {
            debug!(%category, count = options.len(), "Persisting migrated options");
            if let Err(e) = self.store_local(category, &options).await {
                warn!(%category, error = %e, "Failed to persist migrated options");
                self.set_mirror(category, &options);
            }
        } else {
            self.set_mirror(category, &options);
        }
        Some(options)
    }
}

// ============================================================================
// Tests
// ============================================================================
