//! Board-level column catalog
//!
//! A board lists its columns once; item values are then decoded against that
//! listing. The catalog resolves a column by id or title, builds values with
//! the column's settings, and assembles the `column_values` payload used when
//! creating items.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::column_type::ColumnType;
use super::error::{Error, Result};
use super::value::{create_column_value, ColumnValue};

/// A column as listed by a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    /// Platform type tag, e.g. `color` or `multiple-person`
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_str: Option<String>,
}

impl Column {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        column_type: impl Into<String>,
        settings_str: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            column_type: column_type.into(),
            settings_str: settings_str.map(str::to_string),
        }
    }
}

/// Selects a column by exactly one of its id or title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Id(String),
    Title(String),
}

impl ColumnRef {
    pub fn id(id: impl Into<String>) -> Self {
        ColumnRef::Id(id.into())
    }

    pub fn title(title: impl Into<String>) -> Self {
        ColumnRef::Title(title.into())
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Id(id) => write!(f, "id '{}'", id),
            ColumnRef::Title(title) => write!(f, "title '{}'", title),
        }
    }
}

/// The columns of one board
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    columns: Vec<Column>,
}

impl ColumnCatalog {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Parses the board's column listing JSON
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds a column; titles match the first column carrying them
    pub fn column(&self, column_ref: &ColumnRef) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| match column_ref {
                ColumnRef::Id(id) => &c.id == id,
                ColumnRef::Title(title) => &c.title == title,
            })
            .ok_or_else(|| Error::ColumnNotFound(column_ref.to_string()))
    }

    /// Creates an empty value for a column, with the column's settings applied
    pub fn get_column_value(&self, column_ref: &ColumnRef) -> Result<ColumnValue> {
        self.build(column_ref, None)
    }

    /// Creates a value for a column from a raw API value string
    pub fn load_column_value(&self, column_ref: &ColumnRef, raw: &str) -> Result<ColumnValue> {
        self.build(column_ref, Some(raw))
    }

    fn build(&self, column_ref: &ColumnRef, raw: Option<&str>) -> Result<ColumnValue> {
        let column = self.column(column_ref)?;
        let column_type = ColumnType::from_api_type(&column.column_type)?;
        Ok(create_column_value(
            column_type,
            column.id.as_str(),
            column.title.as_str(),
            raw,
            column.settings_str.as_deref(),
        )?)
    }
}

/// Builds the `column_values` argument of an item mutation
pub fn column_values_payload<'a>(
    values: impl IntoIterator<Item = &'a ColumnValue>,
) -> Result<Map<String, Value>> {
    let mut payload = Map::new();
    for value in values {
        if payload.contains_key(value.id()) {
            return Err(Error::DuplicateColumn(value.id().to_string()));
        }
        payload.insert(value.id().to_string(), value.format());
    }
    tracing::debug!(columns = payload.len(), "built column values payload");
    Ok(payload)
}

/// Returns the scalar used to search items by a column value
pub fn search_value(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Date(date) => match date.value() {
            Some(datetime) => Value::String(datetime.date_string()),
            None => value.format(),
        },
        ColumnValue::Status(status) => match status.value() {
            Some(label) => Value::String(label.to_string()),
            None => value.format(),
        },
        _ => value.format(),
    }
}
