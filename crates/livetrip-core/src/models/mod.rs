//! Data models for livetrip vocabularies and the entities that use them.
//!
//! - `SelectOption`, `ColorCode`: one vocabulary entry and its color
//! - `Category`: the vocabularies, with their seeds and storage locations
//! - `Schedule`, `Traffic`, `Stay`: entities that reference labels by text
//! - `Dimension`, `Groupable`: how entities expose fields for grouping

pub mod category;
pub mod entity;
pub mod option;

pub use category::{Category, UnknownCategory, PREFECTURES};
pub use entity::{Dimension, Groupable, Schedule, Stay, Traffic, UnknownDimension};
pub use option::{labels, renumber, ColorCode, InvalidColor, SelectOption, StoredEntry};
