use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The vocabularies users can edit.
///
/// Each category owns an independent, ordered option list, stored locally
/// under [`Category::storage_key`] and remotely under [`Category::remote_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Category {
    Categories,
    Areas,
    Targets,
    Sellers,
    Statuses,
    Transportations,
    Groups,
    StayWebsite,
    StayStatus,
}

/// 47 prefectures in the conventional north-to-south order.
pub const PREFECTURES: &[&str] = &[
    "北海道",
    "青森", "岩手", "宮城", "秋田", "山形", "福島",
    "茨城", "栃木", "群馬", "埼玉", "千葉", "東京", "神奈川",
    "新潟", "富山", "石川", "福井", "山梨", "長野", "岐阜",
    "静岡", "愛知", "三重", "滋賀", "京都", "大阪", "兵庫",
    "奈良", "和歌山", "鳥取", "島根", "岡山", "広島", "山口",
    "徳島", "香川", "愛媛", "高知", "福岡", "佐賀", "長崎",
    "熊本", "大分", "宮崎", "鹿児島", "沖縄",
];

const DEFAULT_CATEGORIES: &[&str] = &["ワンマン", "対バン", "フェス", "イベント", "舞台", "その他"];
const DEFAULT_SELLERS: &[&str] = &["チケットぴあ", "イープラス", "ローチケ", "その他"];
const DEFAULT_STATUSES: &[&str] = &["Canceled", "Pending", "Keep", "Done"];
const DEFAULT_TRANSPORTATIONS: &[&str] = &[
    "🚄 新幹線",
    "✈️ 飛行機",
    "🚃 在来線",
    "🚌 バス",
    "🚗 車",
    "🚕 タクシー",
    "その他",
];

// Spellings that older builds wrote to the device. Each pair is
// (deprecated, canonical); anything else is left alone.
const SELLER_RENAMES: &[(&str, &str)] = &[("ローソンチケット", "ローチケ")];
const TARGET_RENAMES: &[(&str, &str)] = &[("Band B", "Artist B"), ("Band C", "Artist C")];

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Categories,
        Category::Areas,
        Category::Targets,
        Category::Sellers,
        Category::Statuses,
        Category::Transportations,
        Category::Groups,
        Category::StayWebsite,
        Category::StayStatus,
    ];

    /// Short name used on the command line and in remote paths.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Categories => "categories",
            Category::Areas => "areas",
            Category::Targets => "targets",
            Category::Sellers => "sellers",
            Category::Statuses => "statuses",
            Category::Transportations => "transportations",
            Category::Groups => "groups",
            Category::StayWebsite => "website",
            Category::StayStatus => "status",
        }
    }

    fn is_stay(&self) -> bool {
        matches!(self, Category::StayWebsite | Category::StayStatus)
    }

    /// Key of this category's entry in the local key-value store.
    pub fn storage_key(&self) -> String {
        if self.is_stay() {
            format!("@stay_select_options:{}", self.name())
        } else {
            format!("@select_options:{}", self.name())
        }
    }

    /// Path of this category on the remote vocabulary service.
    pub fn remote_path(&self) -> String {
        if self.is_stay() {
            format!("stay-select-options/{}", self.name())
        } else {
            format!("select-options/{}", self.name())
        }
    }

    /// Labels seeded when neither the remote nor the device has data.
    pub fn default_labels(&self) -> &'static [&'static str] {
        match self {
            Category::Categories => DEFAULT_CATEGORIES,
            Category::Areas => PREFECTURES,
            Category::Sellers => DEFAULT_SELLERS,
            Category::Statuses => DEFAULT_STATUSES,
            Category::Transportations => DEFAULT_TRANSPORTATIONS,
            Category::Targets | Category::Groups | Category::StayWebsite | Category::StayStatus => &[],
        }
    }

    /// Whether seeded entries of this category may be deleted.
    pub fn protects_seeded(&self) -> bool {
        matches!(self, Category::Areas)
    }

    /// True if `label` is a seeded entry that must never be deleted.
    pub fn is_protected(&self, label: &str) -> bool {
        self.protects_seeded() && self.default_labels().contains(&label)
    }

    /// Deprecated label spellings and their replacements.
    ///
    /// Kept as an explicit list: these are one-off cleanups of historical
    /// device data, not a general rename mechanism.
    pub fn legacy_renames(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Sellers => SELLER_RENAMES,
            Category::Targets => TARGET_RENAMES,
            _ => &[],
        }
    }

    /// Canonical spelling for `label` in this category.
    pub fn canonical_label<'a>(&self, label: &'a str) -> &'a str {
        self.legacy_renames()
            .iter()
            .find(|(old, _)| *old == label)
            .map(|(_, new)| *new)
            .unwrap_or(label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(category) = Category::ALL.into_iter().find(|c| c.name() == lower) {
            return Ok(category);
        }
        match lower.as_str() {
            "stay-website" | "stay_website" => Ok(Category::StayWebsite),
            "stay-status" | "stay_status" => Ok(Category::StayStatus),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(Category::Sellers.storage_key(), "@select_options:sellers");
        assert_eq!(Category::StayWebsite.storage_key(), "@stay_select_options:website");
    }

    #[test]
    fn test_remote_paths() {
        assert_eq!(Category::Areas.remote_path(), "select-options/areas");
        assert_eq!(Category::StayStatus.remote_path(), "stay-select-options/status");
    }

    #[test]
    fn test_prefecture_list_is_complete() {
        assert_eq!(PREFECTURES.len(), 47);
        assert_eq!(PREFECTURES.first(), Some(&"北海道"));
        assert_eq!(PREFECTURES.last(), Some(&"沖縄"));
    }

    #[test]
    fn test_protected_entries() {
        assert!(Category::Areas.is_protected("東京"));
        assert!(!Category::Areas.is_protected("Seoul"));
        assert!(!Category::Sellers.is_protected("その他"));
    }

    #[test]
    fn test_canonical_label() {
        assert_eq!(Category::Sellers.canonical_label("ローソンチケット"), "ローチケ");
        assert_eq!(Category::Targets.canonical_label("Band C"), "Artist C");
        assert_eq!(Category::Targets.canonical_label("Band D"), "Band D");
        // Renames are scoped to their category
        assert_eq!(Category::Sellers.canonical_label("Band B"), "Band B");
    }

    #[test]
    fn test_parse_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>(), Ok(category));
        }
        assert_eq!("stay-status".parse::<Category>(), Ok(Category::StayStatus));
        assert!("venues".parse::<Category>().is_err());
    }
}
