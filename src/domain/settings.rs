//! Column settings parsing
//!
//! The platform supplies a JSON settings string per column. Only status and
//! dropdown columns constrain their values through it:
//!
//! ```text
//! status:   {"labels": {"0": "Working on it", "1": "Done", "2": "Stuck"}, ...}
//! dropdown: {"labels": [{"id": 1, "name": "Date"}, ...], "hide_footer": false}
//! ```
//!
//! Unknown keys (colors, positions, footers) are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Invalid label index '{0}': expected an integer")]
    InvalidIndex(String),

    #[error("Duplicate label id {0} in settings")]
    DuplicateId(i64),
}

/// A reference to a label, either by its index/id or by its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRef {
    Index(i64),
    Label(String),
}

impl LabelRef {
    /// Reads a label reference from a JSON integer or string
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(LabelRef::Index),
            Value::String(s) => Some(LabelRef::Label(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for LabelRef {
    fn from(index: i64) -> Self {
        LabelRef::Index(index)
    }
}

impl From<i32> for LabelRef {
    fn from(index: i32) -> Self {
        LabelRef::Index(index.into())
    }
}

impl From<&str> for LabelRef {
    fn from(label: &str) -> Self {
        LabelRef::Label(label.to_string())
    }
}

impl From<String> for LabelRef {
    fn from(label: String) -> Self {
        LabelRef::Label(label)
    }
}

#[derive(Deserialize)]
struct RawStatusSettings {
    #[serde(default)]
    labels: HashMap<String, String>,
}

/// Index to label table of a status column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSettings {
    labels: BTreeMap<i64, String>,
}

impl StatusSettings {
    /// Parses a status settings string
    pub fn parse(settings_str: &str) -> Result<Self, SettingsError> {
        let raw: RawStatusSettings =
            serde_json::from_str(settings_str).map_err(|e| SettingsError::Parse(e.to_string()))?;

        let mut labels = BTreeMap::new();
        for (key, label) in raw.labels {
            let index: i64 = key
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidIndex(key.clone()))?;
            labels.insert(index, label);
        }

        Ok(Self { labels })
    }

    /// Returns the label for an index
    pub fn label(&self, index: i64) -> Option<&str> {
        self.labels.get(&index).map(String::as_str)
    }

    /// Returns the index of a label
    pub fn index_of(&self, label: &str) -> Option<i64> {
        self.labels
            .iter()
            .find(|(_, l)| l.as_str() == label)
            .map(|(i, _)| *i)
    }

    /// Resolves a label reference to its `(index, label)` pair
    ///
    /// Strings are matched as labels first, then as a numeric index.
    pub fn resolve(&self, label_ref: &LabelRef) -> Option<(i64, &str)> {
        match label_ref {
            LabelRef::Index(index) => self.label(*index).map(|l| (*index, l)),
            LabelRef::Label(text) => match self.index_of(text) {
                Some(index) => self.label(index).map(|l| (index, l)),
                None => text
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(|index| self.label(index).map(|l| (index, l))),
            },
        }
    }

    /// Iterates over `(index, label)` pairs in index order
    pub fn labels(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels.iter().map(|(i, l)| (*i, l.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A selectable dropdown label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropdownLabel {
    pub id: i64,
    pub name: String,
}

impl DropdownLabel {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Deserialize)]
struct RawDropdownSettings {
    #[serde(default)]
    labels: Vec<DropdownLabel>,
}

/// Id to label table of a dropdown column, in the platform's order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropdownSettings {
    labels: Vec<DropdownLabel>,
}

impl DropdownSettings {
    /// Parses a dropdown settings string
    pub fn parse(settings_str: &str) -> Result<Self, SettingsError> {
        let raw: RawDropdownSettings =
            serde_json::from_str(settings_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
        Self::from_labels(raw.labels)
    }

    /// Builds settings from labels, rejecting duplicate ids
    pub fn from_labels(
        labels: impl IntoIterator<Item = DropdownLabel>,
    ) -> Result<Self, SettingsError> {
        let mut result: Vec<DropdownLabel> = Vec::new();
        for label in labels {
            if result.iter().any(|l| l.id == label.id) {
                return Err(SettingsError::DuplicateId(label.id));
            }
            result.push(label);
        }
        Ok(Self { labels: result })
    }

    /// Returns the label with the given id
    pub fn by_id(&self, id: i64) -> Option<&DropdownLabel> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Returns the label with the given name
    pub fn by_name(&self, name: &str) -> Option<&DropdownLabel> {
        self.labels.iter().find(|l| l.name == name)
    }

    /// Resolves a label reference
    ///
    /// Strings are matched as names first, then as a numeric id.
    pub fn resolve(&self, label_ref: &LabelRef) -> Option<&DropdownLabel> {
        match label_ref {
            LabelRef::Index(id) => self.by_id(*id),
            LabelRef::Label(text) => self.by_name(text).or_else(|| {
                text.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(|id| self.by_id(id))
            }),
        }
    }

    pub fn labels(&self) -> &[DropdownLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str =
        r#"{"labels": {"0": "Working on it", "1": "Done", "2": "Stuck"}, "done_colors": [1]}"#;

    const DROPDOWN: &str = r#"{
        "hide_footer": false,
        "labels": [
            {"id": 1, "name": "Date"},
            {"id": 2, "name": "Datetime"},
            {"id": 3, "name": "Text"}
        ]
    }"#;

    #[test]
    fn parses_status_labels() {
        let settings = StatusSettings::parse(STATUS).unwrap();

        assert_eq!(settings.len(), 3);
        assert_eq!(settings.label(1), Some("Done"));
        assert_eq!(settings.index_of("Stuck"), Some(2));
        assert_eq!(settings.label(5), None);
    }

    #[test]
    fn status_labels_iterate_in_index_order() {
        let settings = StatusSettings::parse(STATUS).unwrap();
        let indexes: Vec<i64> = settings.labels().map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn status_resolves_labels_and_numeric_strings() {
        let settings = StatusSettings::parse(STATUS).unwrap();

        assert_eq!(settings.resolve(&LabelRef::from("Done")), Some((1, "Done")));
        assert_eq!(settings.resolve(&LabelRef::from("1")), Some((1, "Done")));
        assert_eq!(settings.resolve(&LabelRef::from(2)), Some((2, "Stuck")));
        assert_eq!(settings.resolve(&LabelRef::from("123")), None);
        assert_eq!(settings.resolve(&LabelRef::from("Not Done")), None);
    }

    #[test]
    fn status_rejects_non_integer_index() {
        let err = StatusSettings::parse(r#"{"labels": {"first": "Done"}}"#).unwrap_err();
        assert_eq!(err, SettingsError::InvalidIndex("first".into()));
    }

    #[test]
    fn status_without_labels_is_empty() {
        let settings = StatusSettings::parse("{}").unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn malformed_settings_fail() {
        assert!(matches!(
            StatusSettings::parse("not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            DropdownSettings::parse(r#"{"labels": {"1": "x"}}"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn parses_dropdown_labels_in_order() {
        let settings = DropdownSettings::parse(DROPDOWN).unwrap();
        let names: Vec<&str> = settings.labels().iter().map(|l| l.name.as_str()).collect();

        assert_eq!(names, vec!["Date", "Datetime", "Text"]);
        assert_eq!(settings.by_id(2).map(|l| l.name.as_str()), Some("Datetime"));
        assert_eq!(settings.by_name("Text").map(|l| l.id), Some(3));
    }

    #[test]
    fn dropdown_resolution_is_case_sensitive() {
        let settings = DropdownSettings::parse(DROPDOWN).unwrap();

        assert!(settings.resolve(&LabelRef::from("Datetime")).is_some());
        assert!(settings.resolve(&LabelRef::from("dateTime")).is_none());
        assert!(settings.resolve(&LabelRef::from("42069")).is_none());
        assert_eq!(settings.resolve(&LabelRef::from("3")).map(|l| l.id), Some(3));
    }

    #[test]
    fn dropdown_rejects_duplicate_ids() {
        let err = DropdownSettings::from_labels(vec![
            DropdownLabel::new(1, "A"),
            DropdownLabel::new(1, "B"),
        ])
        .unwrap_err();
        assert_eq!(err, SettingsError::DuplicateId(1));
    }

    #[test]
    fn label_ref_from_json() {
        assert_eq!(
            LabelRef::from_json(&serde_json::json!(4)),
            Some(LabelRef::Index(4))
        );
        assert_eq!(
            LabelRef::from_json(&serde_json::json!("Done")),
            Some(LabelRef::Label("Done".into()))
        );
        assert_eq!(LabelRef::from_json(&serde_json::json!([1])), None);
    }
}
