//! Column values
//!
//! A [`ColumnValue`] is the typed, validated value of one column on one item.
//! It is created by [`create_column_value`] from the raw JSON string the API
//! returns, mutated through validated setters, and turned back into the
//! wire shape the API expects with [`ColumnValue::format`].
//!
//! ## Lifecycle
//!
//! ```text
//! raw value ──load──▶ native value ──set──▶ native value ──format──▶ wire JSON
//!                          ▲
//!           settings_str ──┘ (status/dropdown re-resolution)
//! ```
//!
//! Every mutation validates first and commits only on success, so a value is
//! never observable in an invalid state.

mod checkbox;
mod date;
mod dropdown;
mod email;
mod link;
mod long_text;
mod numbers;
mod people;
mod rating;
mod status;
mod text;
mod timeline;

pub use checkbox::CheckboxValue;
pub use date::{DateTimeValue, DateValue, DATE_FORMAT, SIMPLE_DATETIME_FORMAT, TIME_FORMAT};
pub use dropdown::{DropdownState, DropdownValue};
pub use email::{Email, EmailValue};
pub use link::{Link, LinkValue};
pub use long_text::LongTextValue;
pub use numbers::NumbersValue;
pub use people::{PeopleKind, PeopleValue, PersonOrTeam};
pub use rating::{RatingValue, MAX_RATING};
pub use status::{StatusState, StatusValue};
pub use text::TextValue;
pub use timeline::{Timeline, TimelineValue};

use serde_json::{Map, Value};

use super::column_type::ColumnType;
use super::error::{describe, ColumnValueError, ColumnValueErrorKind, Error};

/// Identity of a column value: immutable id and title, plus the raw settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    id: String,
    title: String,
    settings_str: Option<String>,
}

impl ColumnMeta {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            settings_str: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn settings_str(&self) -> Option<&str> {
        self.settings_str.as_deref()
    }

    /// Builds an error for a rejected JSON input
    pub(crate) fn error(&self, value: &Value, kind: ColumnValueErrorKind) -> ColumnValueError {
        self.error_desc(describe(value), kind)
    }

    /// Builds an error for a rejected input already rendered as text
    pub(crate) fn error_desc(
        &self,
        value: impl Into<String>,
        kind: ColumnValueErrorKind,
    ) -> ColumnValueError {
        ColumnValueError::new(&self.id, &self.title, value, kind)
    }

    /// Decodes a raw API value string into JSON
    pub(crate) fn parse_raw(&self, raw: &str) -> Result<Value, ColumnValueError> {
        serde_json::from_str(raw).map_err(|e| {
            self.error_desc(
                format!("raw {:?}", raw),
                ColumnValueErrorKind::Malformed(e.to_string()),
            )
        })
    }
}

/// Behavior shared by every column value variant
pub trait ColumnVariant {
    /// Returns the column type this variant implements
    fn column_type(&self) -> ColumnType;

    fn meta(&self) -> &ColumnMeta;

    fn meta_mut(&mut self) -> &mut ColumnMeta;

    /// Replaces the value with one decoded from a raw API value string
    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError>;

    /// Assigns a value through the variant's conversion table
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError>;

    /// Encodes the value into the shape the API expects for writes
    fn format(&self) -> Value;

    /// Returns the native value rendered as JSON
    fn native(&self) -> Value;

    /// Returns true if the value is the variant's empty sentinel
    fn is_empty(&self) -> bool;

    /// Validates the value against new settings; variants without a settings
    /// schema accept anything
    fn apply_settings(&mut self, _settings_str: Option<&str>) -> Result<(), ColumnValueError> {
        Ok(())
    }
}

/// A typed column value, one variant per supported [`ColumnType`]
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(TextValue),
    Numbers(NumbersValue),
    Date(DateValue),
    Status(StatusValue),
    Dropdown(DropdownValue),
    People(PeopleValue),
    Checkbox(CheckboxValue),
    LongText(LongTextValue),
    Email(EmailValue),
    Link(LinkValue),
    Rating(RatingValue),
    Timeline(TimelineValue),
}

impl ColumnValue {
    /// Creates an empty value of the given type
    pub fn empty(column_type: ColumnType, meta: ColumnMeta) -> Self {
        match column_type {
            ColumnType::Text => ColumnValue::Text(TextValue::new(meta)),
            ColumnType::Numbers => ColumnValue::Numbers(NumbersValue::new(meta)),
            ColumnType::Date => ColumnValue::Date(DateValue::new(meta)),
            ColumnType::Status => ColumnValue::Status(StatusValue::new(meta)),
            ColumnType::Dropdown => ColumnValue::Dropdown(DropdownValue::new(meta)),
            ColumnType::People => ColumnValue::People(PeopleValue::new(meta)),
            ColumnType::Checkbox => ColumnValue::Checkbox(CheckboxValue::new(meta)),
            ColumnType::LongText => ColumnValue::LongText(LongTextValue::new(meta)),
            ColumnType::Email => ColumnValue::Email(EmailValue::new(meta)),
            ColumnType::Link => ColumnValue::Link(LinkValue::new(meta)),
            ColumnType::Rating => ColumnValue::Rating(RatingValue::new(meta)),
            ColumnType::Timeline => ColumnValue::Timeline(TimelineValue::new(meta)),
        }
    }

    fn variant(&self) -> &dyn ColumnVariant {
        match self {
            ColumnValue::Text(v) => v,
            ColumnValue::Numbers(v) => v,
            ColumnValue::Date(v) => v,
            ColumnValue::Status(v) => v,
            ColumnValue::Dropdown(v) => v,
            ColumnValue::People(v) => v,
            ColumnValue::Checkbox(v) => v,
            ColumnValue::LongText(v) => v,
            ColumnValue::Email(v) => v,
            ColumnValue::Link(v) => v,
            ColumnValue::Rating(v) => v,
            ColumnValue::Timeline(v) => v,
        }
    }

    fn variant_mut(&mut self) -> &mut dyn ColumnVariant {
        match self {
            ColumnValue::Text(v) => v,
            ColumnValue::Numbers(v) => v,
            ColumnValue::Date(v) => v,
            ColumnValue::Status(v) => v,
            ColumnValue::Dropdown(v) => v,
            ColumnValue::People(v) => v,
            ColumnValue::Checkbox(v) => v,
            ColumnValue::LongText(v) => v,
            ColumnValue::Email(v) => v,
            ColumnValue::Link(v) => v,
            ColumnValue::Rating(v) => v,
            ColumnValue::Timeline(v) => v,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.variant().column_type()
    }

    pub fn id(&self) -> &str {
        self.variant().meta().id()
    }

    pub fn title(&self) -> &str {
        self.variant().meta().title()
    }

    /// Returns the raw settings string last accepted by this value
    pub fn settings_str(&self) -> Option<&str> {
        self.variant().meta().settings_str()
    }

    /// Replaces the settings, re-resolving any held status/dropdown value
    ///
    /// On error neither the settings nor the value change.
    pub fn set_settings_str(&mut self, settings_str: Option<&str>) -> Result<(), ColumnValueError> {
        let variant = self.variant_mut();
        variant.apply_settings(settings_str)?;
        variant.meta_mut().settings_str = settings_str.map(str::to_string);
        tracing::debug!(
            column = variant.meta().id(),
            has_settings = settings_str.is_some(),
            "applied column settings"
        );
        Ok(())
    }

    /// Replaces the value with one decoded from a raw API value string
    pub fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        self.variant_mut().load(raw)
    }

    /// Assigns a value through the variant's conversion table
    pub fn set(&mut self, input: impl Into<Value>) -> Result<(), ColumnValueError> {
        self.variant_mut().set(input.into())
    }

    /// Resets the value to its empty sentinel
    pub fn clear(&mut self) -> Result<(), ColumnValueError> {
        self.set(Value::Null)
    }

    /// Returns the native value rendered as JSON
    pub fn value(&self) -> Value {
        self.variant().native()
    }

    pub fn is_empty(&self) -> bool {
        self.variant().is_empty()
    }

    /// Encodes the value into the shape the API expects for writes
    ///
    /// Empty values encode as `""` (text, numbers) or `{}` (everything else).
    pub fn format(&self) -> Value {
        self.variant().format()
    }
}

/// Creates a column value of the given type
///
/// `settings_str` is applied before `value` is decoded, so status and
/// dropdown values resolve their labels at construction.
pub fn create_column_value(
    column_type: ColumnType,
    id: impl Into<String>,
    title: impl Into<String>,
    value: Option<&str>,
    settings_str: Option<&str>,
) -> Result<ColumnValue, ColumnValueError> {
    let mut column_value = ColumnValue::empty(column_type, ColumnMeta::new(id, title));

    if settings_str.is_some() {
        column_value.set_settings_str(settings_str)?;
    }
    if let Some(raw) = value {
        column_value.load(raw)?;
    }

    tracing::debug!(
        column = column_value.id(),
        column_type = %column_type,
        loaded = value.is_some(),
        "created column value"
    );
    Ok(column_value)
}

/// Creates a column value from a type tag (own name or platform tag)
pub fn create_column_value_from_tag(
    tag: &str,
    id: impl Into<String>,
    title: impl Into<String>,
    value: Option<&str>,
    settings_str: Option<&str>,
) -> Result<ColumnValue, Error> {
    let column_type: ColumnType = tag.parse()?;
    Ok(create_column_value(column_type, id, title, value, settings_str)?)
}

/// Returns true for raw values the API uses to mean "no value"
pub(crate) fn is_blank_raw(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw == "null"
}

/// Reads an optional string field, treating `null` and `""` as absent
pub(crate) fn optional_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS_SETTINGS: &str = r#"{"labels": {"0": "Working on it", "1": "Done", "2": "Stuck"}}"#;

    #[test]
    fn factory_builds_matching_variant() {
        for column_type in ColumnType::all() {
            let value = create_column_value(*column_type, "col", "Column", None, None).unwrap();
            assert_eq!(value.column_type(), *column_type);
            assert_eq!(value.id(), "col");
            assert_eq!(value.title(), "Column");
            assert!(value.is_empty());
        }
    }

    #[test]
    fn empty_values_format_to_empty_wire_forms() {
        for column_type in ColumnType::all() {
            let value = create_column_value(*column_type, "col", "Column", None, None).unwrap();
            let expected = match column_type {
                ColumnType::Text | ColumnType::Numbers => json!(""),
                _ => json!({}),
            };
            assert_eq!(value.format(), expected, "{}", column_type);
        }
    }

    #[test]
    fn clearing_yields_empty_sentinel() {
        let mut value = create_column_value(
            ColumnType::Status,
            "status_1",
            "Status",
            Some(r#"{"index": 1}"#),
            Some(STATUS_SETTINGS),
        )
        .unwrap();
        assert!(!value.is_empty());

        value.clear().unwrap();
        assert!(value.is_empty());
        assert_eq!(value.value(), Value::Null);
        assert_eq!(value.format(), json!({}));
    }

    #[test]
    fn factory_applies_settings_before_value() {
        let value = create_column_value(
            ColumnType::Status,
            "status_1",
            "Status",
            Some(r#"{"index": 1}"#),
            Some(STATUS_SETTINGS),
        )
        .unwrap();

        assert_eq!(value.value(), json!("Done"));
        assert_eq!(value.settings_str(), Some(STATUS_SETTINGS));
    }

    #[test]
    fn rejected_settings_are_not_committed() {
        let mut value = create_column_value(
            ColumnType::Status,
            "status_1",
            "Status",
            Some(r#"{"index": 2}"#),
            Some(STATUS_SETTINGS),
        )
        .unwrap();

        let err = value
            .set_settings_str(Some(r#"{"labels": {"0": "Only"}}"#))
            .unwrap_err();
        assert_eq!(err.kind, ColumnValueErrorKind::UnknownIndex(2));
        assert_eq!(value.settings_str(), Some(STATUS_SETTINGS));
        assert_eq!(value.value(), json!("Stuck"));
    }

    #[test]
    fn unparseable_settings_are_malformed() {
        let err = create_column_value(
            ColumnType::Status,
            "status_1",
            "Status",
            None,
            Some("not json"),
        )
        .unwrap_err();
        assert!(matches!(err.kind, ColumnValueErrorKind::Malformed(_)));
        assert_eq!(err.id, "status_1");

        let err = create_column_value(
            ColumnType::Dropdown,
            "dropdown_1",
            "Dropdown",
            None,
            Some(r#"{"labels": [{"id": 1, "name": "A"}, {"id": 1, "name": "B"}]}"#),
        )
        .unwrap_err();
        assert!(matches!(err.kind, ColumnValueErrorKind::Malformed(_)));
    }

    #[test]
    fn settings_are_kept_for_types_without_schema() {
        let value =
            create_column_value(ColumnType::Text, "text", "Text", None, Some("{}")).unwrap();
        assert_eq!(value.settings_str(), Some("{}"));
    }

    #[test]
    fn factory_from_tag_maps_platform_names() {
        let value =
            create_column_value_from_tag("color", "status", "Status", None, Some(STATUS_SETTINGS))
                .unwrap();
        assert_eq!(value.column_type(), ColumnType::Status);

        let err = create_column_value_from_tag("formula", "f", "Formula", None, None).unwrap_err();
        assert_eq!(err, Error::UnsupportedColumnType("formula".into()));
    }

    #[test]
    fn malformed_raw_value_is_a_column_value_error() {
        let err = create_column_value(ColumnType::People, "people", "People", Some("{nope"), None)
            .unwrap_err();
        assert!(matches!(err.kind, ColumnValueErrorKind::Malformed(_)));
        assert_eq!(err.id, "people");
        assert_eq!(err.title, "People");
    }

    #[test]
    fn null_raw_value_is_empty() {
        for column_type in ColumnType::all() {
            let value =
                create_column_value(*column_type, "col", "Column", Some("null"), None).unwrap();
            assert!(value.is_empty(), "{}", column_type);
        }
    }
}
