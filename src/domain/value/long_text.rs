//! Long text column value

use serde_json::{json, Value};

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// A long text column, written as `{"text": "..."}`
#[derive(Debug, Clone, PartialEq)]
pub struct LongTextValue {
    meta: ColumnMeta,
    value: Option<String>,
}

impl LongTextValue {
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

impl ColumnVariant for LongTextValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::LongText
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
        match self.meta.parse_raw(raw)? {
            json @ Value::Object(_) => self.set(json),
            other => Err(self.meta.error(
                &other,
                ColumnValueErrorKind::Malformed("expected {\"text\": \"...\"}".into()),
            )),
        }
    }

    /// Scalars convert like a text column; the `{"text": ...}` wire object is
    /// unwrapped
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        self.value = match &input {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Object(object) => match object.get("text") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => return Err(self.meta.error(&input, ColumnValueErrorKind::Composite)),
            },
            Value::Array(_) => return Err(self.meta.error(&input, ColumnValueErrorKind::Composite)),
        };
        Ok(())
    }

    fn format(&self) -> Value {
        match &self.value {
            Some(text) => json!({ "text": text }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        self.value.clone().map_or(Value::Null, Value::String)
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
