//! Core library for livetrip vocabularies.
//!
//! Manages the small user-editable option lists (areas, statuses, sellers,
//! transportations, ...) that schedules, traffic and stays refer to by label,
//! and orders and groups those entities for display.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod options;
pub mod utils;

pub use error::{OptionsError, Result, ValidationError};
pub use models::{Category, ColorCode, Dimension, Groupable, SelectOption};
pub use options::{OptionStore, RankMap, RankMaps, SortMode};
