//! Vocabulary options: storage, migration, colors, ordering and grouping.
//!
//! - `OptionStore`: remote-authoritative reads and writes with a local replica
//! - `migrate`: upgrades lists cached by older builds
//! - `color`: explicit, rule-derived and hash-derived label colors
//! - `ordering`: dense rank maps under custom or phonetic order
//! - `grouping`: partitions entity collections into ordered groups
//! - `editor`: validated add/rename/move/delete

pub mod color;
pub mod editor;
pub mod grouping;
pub mod migrate;
pub mod ordering;
pub mod store;

pub use color::{default_color, fallback_color, ColorResolver, ColorStrategy};
pub use grouping::{partition, partition2, Group, NestedGroup, UNSET};
pub use migrate::{migrate, Migration};
pub use ordering::{RankMap, RankMaps, SortMode};
pub use store::OptionStore;
