//! Partitioning of entity collections into ordered display groups.
//!
//! An entity lands in one group per value it holds for the dimension
//! (several for comma-separated lineups), or in the unset group if it holds
//! none. Groups are ordered with the unset group last; tour groups by their
//! earliest member, everything else by vocabulary rank and then by label.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::models::{Dimension, Groupable};
use crate::utils::collate;

use super::ordering::{RankMap, RankMaps};

/// Title of the group for entities with no value.
pub const UNSET: &str = "未設定";

/// Separator for multi-valued fields.
const MULTI_VALUE_SEPARATOR: char = ',';

#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, T> {
    pub title: String,
    pub entities: Vec<&'a T>,
}

impl<T> Group<'_, T> {
    pub fn is_unset(&self) -> bool {
        self.title == UNSET
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedGroup<'a, T> {
    pub title: String,
    pub subgroups: Vec<Group<'a, T>>,
}

/// Group keys of one entity for `dimension`.
pub fn group_keys<T: Groupable>(entity: &T, dimension: Dimension) -> Vec<String> {
    let Some(value) = entity.dimension_value(dimension) else {
        return vec![UNSET.to_string()];
    };

    let mut keys: Vec<String> = Vec::new();
    if dimension.is_multi_valued() {
        for part in value.split(MULTI_VALUE_SEPARATOR).map(str::trim).filter(|p| !p.is_empty()) {
            if !keys.iter().any(|k| k == part) {
                keys.push(part.to_string());
            }
        }
    } else if !value.trim().is_empty() {
        keys.push(value.trim().to_string());
    }

    if keys.is_empty() {
        keys.push(UNSET.to_string());
    }
    keys
}

struct Bucket<'a, T> {
    entities: Vec<&'a T>,
    earliest: Option<DateTime<Utc>>,
}

fn compare_titles<T>(
    (a, bucket_a): &(String, Bucket<'_, T>),
    (b, bucket_b): &(String, Bucket<'_, T>),
    dimension: Dimension,
    ranks: &RankMap,
) -> Ordering {
    match (a == UNSET, b == UNSET) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    if dimension.is_temporal() {
        // Groups without any dated member go after dated ones
        return match (bucket_a.earliest, bucket_b.earliest) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
    }

    match (ranks.get(a), ranks.get(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => collate(a, b),
    }
}

fn partition_refs<'a, T, I>(entities: I, dimension: Dimension, ranks: &RankMap) -> Vec<Group<'a, T>>
where
    T: Groupable,
    I: IntoIterator<Item = &'a T>,
{
    if dimension == Dimension::None {
        return vec![Group {
            title: String::new(),
            entities: entities.into_iter().collect(),
        }];
    }

    let mut buckets: IndexMap<String, Bucket<'a, T>> = IndexMap::new();
    for entity in entities {
        let timestamp = entity.timestamp();
        for key in group_keys(entity, dimension) {
            let bucket = buckets.entry(key).or_insert_with(|| Bucket {
                entities: Vec::new(),
                earliest: None,
            });
            bucket.entities.push(entity);
            if let Some(ts) = timestamp {
                bucket.earliest = Some(bucket.earliest.map_or(ts, |e| e.min(ts)));
            }
        }
    }

    // Stable sort: remaining ties keep first-appearance order
    let mut sorted: Vec<(String, Bucket<'a, T>)> = buckets.into_iter().collect();
    sorted.sort_by(|a, b| compare_titles(a, b, dimension, ranks));

    sorted
        .into_iter()
        .map(|(title, bucket)| Group {
            title,
            entities: bucket.entities,
        })
        .collect()
}

/// Partition `entities` by `dimension`, ordering groups with `ranks`.
pub fn partition<'a, T: Groupable>(entities: &'a [T], dimension: Dimension, ranks: &RankMap) -> Vec<Group<'a, T>> {
    partition_refs(entities, dimension, ranks)
}

/// Two-level partition: by `primary`, then each primary group by `secondary`.
pub fn partition2<'a, T: Groupable>(
    entities: &'a [T],
    primary: Dimension,
    secondary: Dimension,
    ranks: &RankMaps,
) -> Vec<NestedGroup<'a, T>> {
    partition_refs(entities, primary, ranks.get(primary))
        .into_iter()
        .map(|group| NestedGroup {
            subgroups: partition_refs(group.entities, secondary, ranks.get(secondary)),
            title: group.title,
        })
        .collect()
}
