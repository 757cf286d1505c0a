use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A display color in `#RRGGBB` form.
///
/// Always stored upper-case with a leading `#`, so two codes for the same
/// color compare equal regardless of how they were typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ColorCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color code: {0:?}")]
pub struct InvalidColor(pub String);

impl ColorCode {
    /// Build a color from a compile-time palette entry.
    ///
    /// Palette literals are checked by the color module's tests; anything
    /// coming from users or storage goes through `FromStr` instead.
    pub(crate) fn from_static(hex: &'static str) -> Self {
        Self(hex.to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ColorCode {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
        } else {
            Err(InvalidColor(s.to_string()))
        }
    }
}

impl TryFrom<String> for ColorCode {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorCode> for String {
    fn from(color: ColorCode) -> Self {
        color.0
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SelectOption {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl SelectOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            order: None,
        }
    }

    pub fn with_color(mut self, color: ColorCode) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// An option as found in storage or on the wire.
///
/// Older builds stored bare label strings; current ones store objects.
/// Colors are kept as raw text here so one bad value does not make the
/// whole list unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Label(String),
    Structured {
        label: String,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        order: Option<i64>,
    },
}

impl StoredEntry {
    pub fn label(&self) -> &str {
        match self {
            StoredEntry::Label(label) | StoredEntry::Structured { label, .. } => label,
        }
    }

    /// Convert as-is: unparsable colors are dropped, nothing is derived.
    pub fn into_option(self) -> SelectOption {
        match self {
            StoredEntry::Label(label) => SelectOption::new(label),
            StoredEntry::Structured { label, color, order } => SelectOption {
                label,
                color: color.and_then(|c| c.parse().ok()),
                order,
            },
        }
    }
}

/// Rewrite `order` so it matches list position (`0..N-1`).
pub fn renumber(options: &mut [SelectOption]) {
    for (index, option) in options.iter_mut().enumerate() {
        option.order = Some(index as i64);
    }
}

/// Labels of a list, in list order.
pub fn labels(options: &[SelectOption]) -> Vec<&str> {
    options.iter().map(|o| o.label.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_normalizes() {
        let color: ColorCode = "fee2e2".parse().unwrap();
        assert_eq!(color.as_str(), "#FEE2E2");

        let color: ColorCode = " #007aff ".parse().unwrap();
        assert_eq!(color.as_str(), "#007AFF");
    }

    #[test]
    fn test_color_code_rejects_garbage() {
        assert!("#FFF".parse::<ColorCode>().is_err());
        assert!("red".parse::<ColorCode>().is_err());
        assert!("#GGGGGG".parse::<ColorCode>().is_err());
    }

    #[test]
    fn test_option_serializes_without_empty_fields() {
        let option = SelectOption::new("Keep");
        assert_eq!(serde_json::to_string(&option).unwrap(), r#"{"label":"Keep"}"#);

        let option = SelectOption::new("Done")
            .with_color("#d1fae5".parse().unwrap())
            .with_order(2);
        assert_eq!(
            serde_json::to_string(&option).unwrap(),
            r##"{"label":"Done","color":"#D1FAE5","order":2}"##
        );
    }

    #[test]
    fn test_stored_entry_accepts_both_shapes() {
        let entries: Vec<StoredEntry> =
            serde_json::from_str(r##"["Keep", {"label":"Done","color":"not a color","order":3}]"##).unwrap();
        assert!(matches!(entries[0], StoredEntry::Label(_)));
        assert!(matches!(entries[1], StoredEntry::Structured { .. }));

        let options: Vec<SelectOption> = entries.into_iter().map(StoredEntry::into_option).collect();
        assert_eq!(options[0], SelectOption::new("Keep"));
        assert_eq!(options[1], SelectOption::new("Done").with_order(3));
    }

    #[test]
    fn test_renumber() {
        let mut options = vec![
            SelectOption::new("a").with_order(7),
            SelectOption::new("b"),
            SelectOption::new("c").with_order(7),
        ];
        renumber(&mut options);
        let orders: Vec<_> = options.iter().map(|o| o.order).collect();
        assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
    }
}
