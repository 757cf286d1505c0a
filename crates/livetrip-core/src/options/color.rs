//! Color resolution for vocabulary labels.
//!
//! A label's color comes from, in order: the option's explicit color, the
//! category's derivation rule, and finally a hash of the label into a fixed
//! pastel palette. The last step needs no stored state, so an unknown label
//! renders with the same color on every device, forever.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{Category, ColorCode, SelectOption};

/// Pastel palette for hash-derived colors. Order matters: it is part of
/// the label-to-color mapping.
pub const PALETTE: [&str; 12] = [
    "#FEE2E2", // red
    "#FEF3C7", // amber
    "#D1FAE5", // emerald
    "#DBEAFE", // blue
    "#E9D5FF", // violet
    "#FCE7F3", // pink
    "#E5E7EB", // gray
    "#FED7AA", // orange
    "#ECFCCB", // lime
    "#CCFBF1", // teal
    "#E0E7FF", // indigo
    "#F3E8FF", // purple
];

const NEUTRAL_GRAY: &str = "#E5E7EB";

const PREFECTURE_REGIONS: &[(&str, &[&str])] = &[
    ("北海道", &["北海道"]),
    ("東北", &["青森", "岩手", "宮城", "秋田", "山形", "福島"]),
    ("関東", &["茨城", "栃木", "群馬", "埼玉", "千葉", "東京", "神奈川"]),
    ("甲信越", &["新潟", "富山", "石川", "福井", "山梨", "長野"]),
    ("東海", &["岐阜", "静岡", "愛知", "三重"]),
    ("近畿", &["滋賀", "京都", "大阪", "兵庫", "奈良", "和歌山"]),
    ("中国", &["鳥取", "島根", "岡山", "広島", "山口"]),
    ("四国", &["徳島", "香川", "愛媛", "高知"]),
    ("九州", &["福岡", "佐賀", "長崎", "熊本", "大分", "宮崎", "鹿児島", "沖縄"]),
];

const REGION_COLORS: &[(&str, &str)] = &[
    ("北海道", "#DBEAFE"),
    ("東北", "#E9D5FF"),
    ("関東", "#FEE2E2"),
    ("甲信越", "#FED7AA"),
    ("東海", "#D1FAE5"),
    ("近畿", "#FEF3C7"),
    ("中国", "#CCFBF1"),
    ("四国", "#ECFCCB"),
    ("九州", "#FCE7F3"),
];

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("フェス", "#FEE2E2"),
    ("イベント", "#D1FAE5"),
    ("舞台", "#E9D5FF"),
    ("その他", NEUTRAL_GRAY),
];

const SELLER_COLORS: &[(&str, &str)] = &[
    ("チケットぴあ", "#BFDBFE"),
    ("イープラス", "#F9D5E5"),
    ("ローチケ", "#93C5FD"),
    ("その他", NEUTRAL_GRAY),
];

// Pending is deliberately absent and falls through to the hash
const STATUS_COLORS: &[(&str, &str)] = &[
    ("Canceled", NEUTRAL_GRAY),
    ("Keep", "#BFDBFE"),
    ("Done", "#D1FAE5"),
];

fn lookup(table: &[(&str, &'static str)], label: &str) -> Option<&'static str> {
    table.iter().find(|(key, _)| *key == label).map(|(_, color)| *color)
}

/// Region a prefecture belongs to.
pub fn region_of(prefecture: &str) -> Option<&'static str> {
    PREFECTURE_REGIONS
        .iter()
        .find(|(_, members)| members.contains(&prefecture))
        .map(|(region, _)| *region)
}

/// Category-specific rule for deriving a default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStrategy {
    /// Prefectures share their region's color.
    Region,
    /// Fixed colors for a closed set of labels.
    Palette(&'static [(&'static str, &'static str)]),
    /// Every label gets the same color.
    Uniform(&'static str),
    /// No rule; always hash.
    Hash,
}

impl ColorStrategy {
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Areas => ColorStrategy::Region,
            Category::Categories => ColorStrategy::Palette(CATEGORY_COLORS),
            Category::Sellers => ColorStrategy::Palette(SELLER_COLORS),
            Category::Statuses | Category::StayStatus => ColorStrategy::Palette(STATUS_COLORS),
            Category::Transportations => ColorStrategy::Uniform(NEUTRAL_GRAY),
            Category::Targets | Category::Groups | Category::StayWebsite => ColorStrategy::Hash,
        }
    }

    /// Color this rule assigns to `label`, if any.
    pub fn derive(&self, label: &str) -> Option<ColorCode> {
        let hex = match self {
            ColorStrategy::Region => region_of(label).and_then(|r| lookup(REGION_COLORS, r)),
            ColorStrategy::Palette(table) => lookup(table, label),
            ColorStrategy::Uniform(hex) => Some(*hex),
            ColorStrategy::Hash => None,
        };
        hex.map(ColorCode::from_static)
    }
}

/// Polynomial string hash (`h = c + (h << 5) - h`) over UTF-16 code units,
/// with the shift done in wrapping 32-bit arithmetic. Matches the colors
/// existing clients already show.
pub fn label_hash(label: &str) -> i64 {
    label.encode_utf16().fold(0i64, |acc, unit| {
        let shifted = i64::from((acc as i32).wrapping_shl(5));
        i64::from(unit) + shifted - acc
    })
}

/// Deterministic palette color for any label.
pub fn fallback_color(label: &str) -> ColorCode {
    let index = (label_hash(label).unsigned_abs() % PALETTE.len() as u64) as usize;
    ColorCode::from_static(PALETTE[index])
}

/// Default color for a label with no explicit color.
pub fn default_color(label: &str, category: Category) -> ColorCode {
    ColorStrategy::for_category(category)
        .derive(label)
        .unwrap_or_else(|| fallback_color(label))
}

/// Memoizing color lookup, one per session.
///
/// Entries are keyed by `(category, label)` and never evicted. Successful
/// writes through the option store record the colors they committed, so an
/// edited color shows up without a restart.
#[derive(Default)]
pub struct ColorResolver {
    memo: Mutex<HashMap<(Category, String), ColorCode>>,
}

impl ColorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn memoized(&self, category: Category, label: &str) -> Option<ColorCode> {
        let memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        memo.get(&(category, label.to_string())).cloned()
    }

    fn memoize(&self, category: Category, label: &str, color: ColorCode) {
        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        memo.insert((category, label.to_string()), color);
    }

    /// True if `label` has already been resolved for `category`.
    pub fn is_cached(&self, category: Category, label: &str) -> bool {
        self.memoized(category, label).is_some()
    }

    /// Resolve against the category's current option list.
    pub fn resolve_in(&self, label: &str, category: Category, options: &[SelectOption]) -> ColorCode {
        if let Some(color) = self.memoized(category, label) {
            return color;
        }
        let color = options
            .iter()
            .find(|o| o.label == label)
            .and_then(|o| o.color.clone())
            .unwrap_or_else(|| default_color(label, category));
        self.memoize(category, label, color.clone());
        color
    }

    /// Synchronous lookup for render paths: memoized color if known,
    /// otherwise the derived default. Never touches storage.
    pub fn resolve_cached(&self, label: &str, category: Category) -> ColorCode {
        self.memoized(category, label)
            .unwrap_or_else(|| default_color(label, category))
    }

    /// Record explicit colors of a list that was just committed.
    pub fn remember(&self, category: Category, options: &[SelectOption]) {
        for option in options {
            if let Some(color) = &option.color {
                self.memoize(category, &option.label, color.clone());
            }
        }
    }
}
