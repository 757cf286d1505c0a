//! Upgrades option lists cached by older builds.
//!
//! Every step is idempotent: feeding the output back in reports no change
//! and yields an identical list.

use indexmap::IndexMap;
use tracing::debug;

use crate::cache::CacheError;
use crate::models::{Category, ColorCode, SelectOption, StoredEntry};

use super::color::default_color;

/// Result of normalizing one cached list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub options: Vec<SelectOption>,
    /// True if `options` differs from what was stored and should be
    /// written back.
    pub changed: bool,
}

/// Decode a cached value. Anything other than a JSON array of labels or
/// option objects is malformed.
pub fn parse(key: &str, raw: &str) -> Result<Vec<StoredEntry>, CacheError> {
    serde_json::from_str(raw).map_err(|e| CacheError::Malformed {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// Normalize a cached list for `category`.
pub fn migrate(category: Category, entries: Vec<StoredEntry>) -> Migration {
    let mut changed = false;
    let mut merged: IndexMap<String, SelectOption> = IndexMap::with_capacity(entries.len());

    for (position, entry) in entries.into_iter().enumerate() {
        let raw_label = entry.label().trim();
        if raw_label.is_empty() {
            changed = true;
            continue;
        }

        let label = category.canonical_label(raw_label).to_string();
        if label != entry.label() {
            debug!(%category, from = entry.label(), to = %label, "Renaming legacy label");
            changed = true;
        }

        let option = match entry {
            StoredEntry::Label(_) => {
                changed = true;
                SelectOption {
                    color: Some(default_color(&label, category)),
                    order: Some(position as i64),
                    label,
                }
            }
            StoredEntry::Structured { color, order, .. } => {
                let parsed: Option<ColorCode> = color.as_deref().and_then(|c| c.parse().ok());
                // A color is only rewritten if it was unreadable or not canonical
                if color.is_some() && parsed.as_ref().map(ColorCode::as_str) != color.as_deref() {
                    changed = true;
                }
                SelectOption { label, color: parsed, order }
            }
        };

        match merged.get_mut(&option.label) {
            Some(existing) => {
                debug!(%category, label = %option.label, "Collapsing duplicate label");
                changed = true;
                if option.color.is_some() {
                    existing.color = option.color;
                }
                if option.order.is_some() {
                    existing.order = option.order;
                }
            }
            None => {
                merged.insert(option.label.clone(), option);
            }
        }
    }

    // A list with no usable entries is left empty so the caller falls back
    // to unsaved defaults
    if category.protects_seeded() && !merged.is_empty() {
        for label in category.default_labels() {
            if !merged.contains_key(*label) {
                changed = true;
                let order = merged.len() as i64;
                merged.insert(
                    label.to_string(),
                    SelectOption::new(*label)
                        .with_color(default_color(label, category))
                        .with_order(order),
                );
            }
        }
    }

    Migration {
        options: merged.into_values().collect(),
        changed,
    }
}

/// Seeded list for a category with no stored data.
pub fn seed(category: Category) -> Vec<SelectOption> {
    category
        .default_labels()
        .iter()
        .enumerate()
        .map(|(i, label)| {
            SelectOption::new(*label)
                .with_color(default_color(label, category))
                .with_order(i as i64)
        })
        .collect()
}
