//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the vocabulary service URL, an optional share id for read-only views,
//! per-category sort modes and an optional log file.
//!
//! Configuration is stored at `~/.config/livetrip/config.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_BASE_URL;
use crate::models::Category;
use crate::options::SortMode;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "livetrip";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variables that override file settings.
pub const ENV_API_URL: &str = "LIVETRIP_API_URL";
pub const ENV_TOKEN: &str = "LIVETRIP_TOKEN";
pub const ENV_SHARE_ID: &str = "LIVETRIP_SHARE_ID";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub share_id: Option<String>,
    pub sort_modes: HashMap<Category, SortMode>,
    pub log_file: Option<PathBuf>,
    /// Never written to disk; only taken from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Cache directory. Shared views get their own subdirectory so a
    /// borrowed vocabulary never overwrites the user's own.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;

        let mut path = cache_dir.join(APP_NAME);
        if let Some(ref share_id) = self.share_id {
            path = path.join("share").join(share_id);
        }
        Ok(path)
    }

    /// Apply `LIVETRIP_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_API_URL) {
            self.api_base_url = Some(url);
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(share_id) = get(ENV_SHARE_ID) {
            self.share_id = Some(share_id);
        }
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    pub fn sort_mode(&self, category: Category) -> SortMode {
        self.sort_modes.get(&category).copied().unwrap_or_default()
    }
}
