//! Text column value

use serde_json::Value;

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// A plain text column
///
/// Assignment converts scalars to their string form (`12345` → `"12345"`) and
/// rejects arrays and objects.
#[derive(Debug, Clone, PartialEq)]
pub struct TextValue {
    meta: ColumnMeta,
    value: Option<String>,
}

impl TextValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.value = Some(text.into());
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl ColumnVariant for TextValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Text
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.value = None;
            return Ok(());
        }
        let json = self.meta.parse_raw(raw)?;
        self.set(json)
    }

    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        self.value = match input {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(self.meta.error(&input, ColumnValueErrorKind::Composite))
            }
        };
        Ok(())
    }

    fn format(&self) -> Value {
        Value::String(self.value.clone().unwrap_or_default())
    }

    fn native(&self) -> Value {
        self.value.clone().map_or(Value::Null, Value::String)
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
