use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// An entity field that collections can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    None,
    /// Tour/series name; groups are ordered by their earliest member.
    Group,
    Category,
    Area,
    Target,
    /// Comma-separated performers; one entity can land in several groups.
    Lineup,
    Seller,
    Status,
    Transportation,
    Website,
    StayStatus,
}

impl Dimension {
    pub const ALL: [Dimension; 11] = [
        Dimension::None,
        Dimension::Group,
        Dimension::Category,
        Dimension::Area,
        Dimension::Target,
        Dimension::Lineup,
        Dimension::Seller,
        Dimension::Status,
        Dimension::Transportation,
        Dimension::Website,
        Dimension::StayStatus,
    ];

    /// The vocabulary whose ranks order this dimension's groups.
    pub fn category(&self) -> Option<Category> {
        match self {
            Dimension::None => None,
            Dimension::Group => Some(Category::Groups),
            Dimension::Category => Some(Category::Categories),
            Dimension::Area => Some(Category::Areas),
            Dimension::Target | Dimension::Lineup => Some(Category::Targets),
            Dimension::Seller => Some(Category::Sellers),
            Dimension::Status => Some(Category::Statuses),
            Dimension::Transportation => Some(Category::Transportations),
            Dimension::Website => Some(Category::StayWebsite),
            Dimension::StayStatus => Some(Category::StayStatus),
        }
    }

    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Dimension::Lineup)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Dimension::Group)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::None => "none",
            Dimension::Group => "group",
            Dimension::Category => "category",
            Dimension::Area => "area",
            Dimension::Target => "target",
            Dimension::Lineup => "lineup",
            Dimension::Seller => "seller",
            Dimension::Status => "status",
            Dimension::Transportation => "transportation",
            Dimension::Website => "website",
            Dimension::StayStatus => "stay_status",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown dimension: {0}")]
pub struct UnknownDimension(pub String);

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase().replace('-', "_");
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == lower)
            .ok_or_else(|| UnknownDimension(s.to_string()))
    }
}

/// Something that can be partitioned by the grouping engine.
pub trait Groupable {
    /// Raw value for `dimension`, or `None` if the entity has no such field.
    fn dimension_value(&self, dimension: Dimension) -> Option<&str>;

    /// Point in time used to order temporal groups.
    fn timestamp(&self) -> Option<DateTime<Utc>> {
        None
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    // Date-only values sort at midnight UTC
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// A live event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub lineup: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Groupable for Schedule {
    fn dimension_value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            // Ungrouped schedules form a group of their own title
            Dimension::Group => non_blank(&self.group).or_else(|| {
                Some(self.title.as_str()).filter(|t| !t.trim().is_empty())
            }),
            Dimension::Category => non_blank(&self.category),
            Dimension::Area => non_blank(&self.area),
            Dimension::Target => non_blank(&self.target),
            Dimension::Lineup => non_blank(&self.lineup),
            Dimension::Seller => non_blank(&self.seller),
            Dimension::Status => non_blank(&self.status),
            _ => None,
        }
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.datetime.as_deref().and_then(parse_timestamp)
    }
}

/// One leg of travel to or from a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub schedule_id: i64,
    pub date: String,
    #[serde(default)]
    pub transportation: Option<String>,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

impl Groupable for Traffic {
    fn dimension_value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Transportation => non_blank(&self.transportation),
            _ => None,
        }
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date)
    }
}

/// A hotel stay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stay {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub schedule_id: i64,
    pub check_in: String,
    #[serde(default)]
    pub check_out: String,
    pub hotel_name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Groupable for Stay {
    fn dimension_value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Website => non_blank(&self.website),
            Dimension::Status | Dimension::StayStatus => non_blank(&self.status),
            _ => None,
        }
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.check_in)
    }
}
