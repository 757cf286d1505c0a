//! Dense label ranks for ordering groups and option lists.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Category, Dimension, SelectOption};
use crate::utils::collate;

/// How a vocabulary is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortMode {
    /// User-arranged order (`order` field, else list position).
    #[default]
    #[serde(rename = "custom")]
    Custom,
    /// Japanese reading order of the label.
    #[serde(rename = "kana")]
    Phonetic,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Custom => "custom",
            SortMode::Phonetic => "kana",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(SortMode::Custom),
            "kana" | "phonetic" => Ok(SortMode::Phonetic),
            other => Err(format!("Unknown sort mode: {}", other)),
        }
    }
}

/// Label → rank, with ranks forming exactly `0..N-1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankMap {
    ranks: HashMap<String, usize>,
}

impl RankMap {
    pub fn get(&self, label: &str) -> Option<usize> {
        self.ranks.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.ranks.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Labels in rank order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<(&str, usize)> = self.ranks.iter().map(|(l, r)| (l.as_str(), *r)).collect();
        labels.sort_by_key(|(_, rank)| *rank);
        labels.into_iter().map(|(l, _)| l).collect()
    }
}

impl FromIterator<(String, usize)> for RankMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().collect(),
        }
    }
}

/// Rank maps for every groupable dimension.
///
/// Dimensions sharing a vocabulary (target and lineup) share one ranking.
/// Missing dimensions behave as an empty map: every group is unranked.
#[derive(Debug, Clone, Default)]
pub struct RankMaps {
    maps: HashMap<Dimension, RankMap>,
    empty: RankMap,
}

impl RankMaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded vocabularies, each ordered by its configured mode
    /// (custom when unconfigured).
    pub fn from_lists(
        lists: &[(Category, Vec<SelectOption>)],
        modes: &HashMap<Category, SortMode>,
    ) -> Self {
        let mut maps = Self::new();
        for (category, options) in lists {
            let mode = modes.get(category).copied().unwrap_or_default();
            let map = build(options, mode);
            for dimension in Dimension::ALL {
                if dimension.category() == Some(*category) {
                    maps.insert(dimension, map.clone());
                }
            }
        }
        maps
    }

    pub fn insert(&mut self, dimension: Dimension, map: RankMap) {
        self.maps.insert(dimension, map);
    }

    pub fn get(&self, dimension: Dimension) -> &RankMap {
        self.maps.get(&dimension).unwrap_or(&self.empty)
    }
}

/// Positions of `options` in display order. Ties keep input order, and a
/// repeated label only counts at its first position.
fn display_order(options: &[SelectOption], mode: SortMode) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut positions: Vec<usize> = (0..options.len())
        .filter(|&i| seen.insert(options[i].label.as_str()))
        .collect();

    match mode {
        SortMode::Custom => {
            // Stable sort keeps input order among equal keys
            positions.sort_by_key(|&i| (options[i].order.unwrap_or(i as i64), i));
        }
        SortMode::Phonetic => {
            positions.sort_by(|&a, &b| {
                collate(&options[a].label, &options[b].label).then(a.cmp(&b))
            });
        }
    }
    positions
}

/// Build a dense rank map for `options` under `mode`.
pub fn build(options: &[SelectOption], mode: SortMode) -> RankMap {
    display_order(options, mode)
        .into_iter()
        .enumerate()
        .map(|(rank, i)| (options[i].label.clone(), rank))
        .collect()
}

/// `options` sorted for display with `order` rewritten to the dense rank.
/// Repeated labels are dropped after their first occurrence.
pub fn apply(options: &[SelectOption], mode: SortMode) -> Vec<SelectOption> {
    display_order(options, mode)
        .into_iter()
        .enumerate()
        .map(|(rank, i)| SelectOption {
            order: Some(rank as i64),
            ..options[i].clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(label: &str, order: Option<i64>) -> SelectOption {
        SelectOption {
            label: label.to_string(),
            color: None,
            order,
        }
    }

    fn assert_dense(map: &RankMap) {
        let mut ranks: Vec<usize> = map.labels().iter().filter_map(|l| map.get(l)).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (0..map.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_custom_uses_order_field() {
        let map = build(&[opt("Tokyo", Some(1)), opt("Hokkaido", Some(0))], SortMode::Custom);
        assert_eq!(map.get("Hokkaido"), Some(0));
        assert_eq!(map.get("Tokyo"), Some(1));
    }

    #[test]
    fn test_custom_densifies_gaps_and_duplicates() {
        let options = vec![
            opt("a", Some(10)),
            opt("b", Some(3)),
            opt("c", Some(3)),
            opt("d", None),
            opt("e", Some(-4)),
        ];
        let map = build(&options, SortMode::Custom);
        assert_dense(&map);
        assert_eq!(map.labels(), vec!["e", "b", "c", "d", "a"]);
    }

    #[test]
    fn test_custom_falls_back_to_position() {
        let map = build(&[opt("x", None), opt("y", None), opt("z", None)], SortMode::Custom);
        assert_eq!(map.labels(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_phonetic_ignores_order() {
        let options = vec![opt("さくら", Some(0)), opt("あお", Some(1)), opt("カニ", Some(2))];
        let map = build(&options, SortMode::Phonetic);
        assert_eq!(map.labels(), vec!["あお", "カニ", "さくら"]);
        assert_dense(&map);
    }

    #[test]
    fn test_repeated_labels_keep_first_rank() {
        let options = vec![opt("a", None), opt("b", None), opt("a", Some(9))];
        let map = build(&options, SortMode::Custom);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(0));
        assert_dense(&map);
    }

    #[test]
    fn test_apply_rewrites_order() {
        let options = vec![opt("b", Some(5)), opt("a", Some(2))];
        let applied = apply(&options, SortMode::Custom);
        assert_eq!(applied, vec![opt("a", Some(0)), opt("b", Some(1))]);
    }

    #[test]
    fn test_rank_maps_share_vocabularies() {
        let lists = vec![
            (Category::Targets, vec![opt("B", None), opt("A", None)]),
            (Category::Areas, vec![opt("東京", Some(1)), opt("北海道", Some(0))]),
        ];
        let mut modes = HashMap::new();
        modes.insert(Category::Targets, SortMode::Phonetic);

        let maps = RankMaps::from_lists(&lists, &modes);
        assert_eq!(maps.get(Dimension::Target).labels(), vec!["A", "B"]);
        assert_eq!(maps.get(Dimension::Lineup), maps.get(Dimension::Target));
        assert_eq!(maps.get(Dimension::Area).labels(), vec!["北海道", "東京"]);
        assert!(maps.get(Dimension::Seller).is_empty());
    }

    #[test]
    fn test_sort_mode_wire_names() {
        assert_eq!(serde_json::to_string(&SortMode::Phonetic).unwrap(), "\"kana\"");
        assert_eq!("custom".parse::<SortMode>(), Ok(SortMode::Custom));
        assert_eq!("phonetic".parse::<SortMode>(), Ok(SortMode::Phonetic));
        assert!("random".parse::<SortMode>().is_err());
    }
}
