//! Utility functions for label comparison.

pub mod collate;

pub use collate::compare as collate;
