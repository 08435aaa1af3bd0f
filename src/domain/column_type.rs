//! Registry of supported column kinds
//!
//! Each [`ColumnType`] maps to exactly one value variant and one settings
//! schema. The platform names its kinds with its own tags (`color` for status,
//! `multiple-person` for people, ...), see [`ColumnType::from_api_type`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// The kind of settings a column type consults when validating values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSchema {
    /// Settings are ignored
    None,
    /// `{"labels": {"<index>": "<label>", ...}}`
    StatusLabels,
    /// `{"labels": [{"id": <id>, "name": "<label>"}, ...]}`
    DropdownLabels,
}

/// Supported column kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Numbers,
    Date,
    Status,
    Dropdown,
    People,
    Checkbox,
    LongText,
    Email,
    Link,
    Rating,
    Timeline,
}

impl ColumnType {
    /// Returns all supported column types
    pub fn all() -> &'static [ColumnType] {
        &[
            ColumnType::Text,
            ColumnType::Numbers,
            ColumnType::Date,
            ColumnType::Status,
            ColumnType::Dropdown,
            ColumnType::People,
            ColumnType::Checkbox,
            ColumnType::LongText,
            ColumnType::Email,
            ColumnType::Link,
            ColumnType::Rating,
            ColumnType::Timeline,
        ]
    }

    /// Returns the snake-case name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Numbers => "numbers",
            ColumnType::Date => "date",
            ColumnType::Status => "status",
            ColumnType::Dropdown => "dropdown",
            ColumnType::People => "people",
            ColumnType::Checkbox => "checkbox",
            ColumnType::LongText => "long_text",
            ColumnType::Email => "email",
            ColumnType::Link => "link",
            ColumnType::Rating => "rating",
            ColumnType::Timeline => "timeline",
        }
    }

    /// Returns the tags the platform uses for this type, canonical tag first
    pub fn api_types(&self) -> &'static [&'static str] {
        match self {
            ColumnType::Text => &["text"],
            ColumnType::Numbers => &["numeric", "numbers"],
            ColumnType::Date => &["date"],
            ColumnType::Status => &["color", "status"],
            ColumnType::Dropdown => &["dropdown"],
            ColumnType::People => &["multiple-person", "people"],
            ColumnType::Checkbox => &["boolean", "checkbox"],
            ColumnType::LongText => &["long-text"],
            ColumnType::Email => &["email"],
            ColumnType::Link => &["link"],
            ColumnType::Rating => &["rating"],
            ColumnType::Timeline => &["timerange", "timeline"],
        }
    }

    /// Maps a platform type tag to a column type
    pub fn from_api_type(tag: &str) -> Result<Self, Error> {
        let tag = tag.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.api_types().iter().any(|api| api.eq_ignore_ascii_case(tag)))
            .ok_or_else(|| Error::UnsupportedColumnType(tag.to_string()))
    }

    /// Returns the settings schema values of this type are validated against
    pub fn settings_schema(&self) -> SettingsSchema {
        match self {
            ColumnType::Status => SettingsSchema::StatusLabels,
            ColumnType::Dropdown => SettingsSchema::DropdownLabels,
            _ => SettingsSchema::None,
        }
    }

    /// Returns true if values cannot be assigned until settings are known
    pub fn requires_settings(&self) -> bool {
        self.settings_schema() != SettingsSchema::None
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = Error;

    /// Accepts the snake-case name (`long_text`, `long-text`) or any platform tag
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .map_or_else(|| Self::from_api_type(s), Ok)
    }
}
