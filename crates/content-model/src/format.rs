use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod keys {
    pub const DIRECTION: &str = "direction";
    pub const TEXT_ALIGN: &str = "textAlign";
    pub const MARGIN_TOP: &str = "marginTop";
    pub const MARGIN_RIGHT: &str = "marginRight";
    pub const MARGIN_BOTTOM: &str = "marginBottom";
    pub const MARGIN_LEFT: &str = "marginLeft";
    pub const PADDING_TOP: &str = "paddingTop";
    pub const PADDING_RIGHT: &str = "paddingRight";
    pub const PADDING_BOTTOM: &str = "paddingBottom";
    pub const PADDING_LEFT: &str = "paddingLeft";
    pub const BORDER_TOP: &str = "borderTop";
    pub const BORDER_RIGHT: &str = "borderRight";
    pub const BORDER_BOTTOM: &str = "borderBottom";
    pub const BORDER_LEFT: &str = "borderLeft";
    pub const BACKGROUND_COLOR: &str = "backgroundColor";
    pub const TEXT_COLOR: &str = "textColor";
    pub const FONT_FAMILY: &str = "fontFamily";
    pub const FONT_SIZE: &str = "fontSize";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Open key/value format record attached to blocks, segments, list levels
/// and table cells. Values are CSS-like strings (`"40px"`, `"rtl"`,
/// `"1px solid red"`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Format(BTreeMap<String, String>);

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Sets `key` when a non-empty value is given, otherwise removes it.
    pub fn set_or_remove(&mut self, key: &str, value: Option<String>) {
        match value {
            Some(value) if !value.is_empty() => self.set(key, value),
            _ => {
                self.remove(key);
            }
        }
    }

    /// Exchanges the values stored under two keys, keeping absence as absence.
    pub fn swap(&mut self, a: &str, b: &str) {
        let left = self.remove(a);
        let right = self.remove(b);
        self.set_or_remove(a, right);
        self.set_or_remove(b, left);
    }

    pub fn direction(&self) -> Direction {
        match self.get(keys::DIRECTION) {
            Some("rtl") => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Format {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Parses a CSS length into pixels. Unknown units and garbage parse as 0.
pub fn parse_value_with_unit(value: &str) -> f64 {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let Ok(number) = number.parse::<f64>() else {
        return 0.0;
    };

    let px = match unit.trim() {
        "" | "px" => number,
        "pt" => number * 4.0 / 3.0,
        "em" | "rem" => number * DEFAULT_FONT_SIZE_PX,
        "in" => number * 96.0,
        "cm" => number * 96.0 / 2.54,
        "mm" => number * 96.0 / 25.4,
        _ => 0.0,
    };
    if px.is_finite() { px } else { 0.0 }
}

const BORDER_STYLES: &[&str] = &[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorderValues {
    pub width: Option<String>,
    pub style: Option<String>,
    pub color: Option<String>,
}

/// Splits a combined border value (`"1px solid rgb(0, 0, 0)"`) into parts.
pub fn extract_border_values(combined: Option<&str>) -> BorderValues {
    let mut result = BorderValues::default();
    let Some(combined) = combined else {
        return result;
    };

    let compact = combined.replace(", ", ",");
    for part in compact.split_whitespace() {
        if BORDER_STYLES.contains(&part) && result.style.is_none() {
            result.style = Some(part.to_string());
        } else if is_border_width(part) && result.width.is_none() {
            result.width = Some(part.to_string());
        } else if result.color.is_none() {
            result.color = Some(part.replace(',', ", "));
        }
    }
    result
}

fn is_border_width(part: &str) -> bool {
    matches!(part, "thin" | "medium" | "thick")
        || part.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

pub fn combine_border_value(values: &BorderValues) -> String {
    [&values.width, &values.style, &values.color]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_units() {
        assert_eq!(parse_value_with_unit("40px"), 40.0);
        assert_eq!(parse_value_with_unit("30pt"), 40.0);
        assert_eq!(parse_value_with_unit("2em"), 32.0);
        assert_eq!(parse_value_with_unit("12"), 12.0);
        assert_eq!(parse_value_with_unit(""), 0.0);
        assert_eq!(parse_value_with_unit("auto"), 0.0);
    }

    #[test]
    fn border_values_keep_spaced_colors_together() {
        let values = extract_border_values(Some("2px dashed rgb(10, 20, 30)"));
        assert_eq!(values.width.as_deref(), Some("2px"));
        assert_eq!(values.style.as_deref(), Some("dashed"));
        assert_eq!(values.color.as_deref(), Some("rgb(10, 20, 30)"));
        assert_eq!(combine_border_value(&values), "2px dashed rgb(10, 20, 30)");
    }

    #[test]
    fn swap_preserves_absence() {
        let mut format = Format::new().with(keys::MARGIN_LEFT, "40px");
        format.swap(keys::MARGIN_LEFT, keys::MARGIN_RIGHT);
        assert_eq!(format.get(keys::MARGIN_RIGHT), Some("40px"));
        assert!(!format.contains(keys::MARGIN_LEFT));
    }
}
