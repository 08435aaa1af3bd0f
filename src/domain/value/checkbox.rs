//! Checkbox column value

use serde_json::{json, Value};

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// A checkbox column
///
/// The API writes a checked box as `{"checked": "true"}` and clears it with
/// an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckboxValue {
    meta: ColumnMeta,
    checked: bool,
}

impl CheckboxValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self {
            meta,
            checked: false,
        }
    }

    pub fn value(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    fn to_bool(&self, input: &Value) -> Result<bool, ColumnValueError> {
        let invalid = || {
            self.meta.error(
                input,
                ColumnValueErrorKind::Invalid("expected true or false".into()),
            )
        };
        match input {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                _ => Err(invalid()),
            },
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(invalid()),
            },
            Value::Object(object) => match object.get("checked") {
                Some(checked) if !checked.is_object() => self.to_bool(checked),
                None => Ok(false),
                Some(_) => Err(invalid()),
            },
            Value::Array(_) => Err(self.meta.error(input, ColumnValueErrorKind::Composite)),
        }
    }
}

impl ColumnVariant for CheckboxValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Checkbox
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.checked = false;
            return Ok(());
        }
        let json = self.meta.parse_raw(raw)?;
        self.checked = self.to_bool(&json)?;
        Ok(())
    }

    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        self.checked = self.to_bool(&input)?;
        Ok(())
    }

    fn format(&self) -> Value {
        if self.checked {
            json!({ "checked": "true" })
        } else {
            json!({})
        }
    }

    fn native(&self) -> Value {
        Value::Bool(self.checked)
    }

    fn is_empty(&self) -> bool {
        !self.checked
    }
}
