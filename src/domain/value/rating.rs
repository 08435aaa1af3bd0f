//! Rating column value

use serde_json::{json, Value};

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// Highest rating a column accepts; ratings start at 1
pub const MAX_RATING: u8 = 5;

/// A rating column, written as `{"rating": n}`
#[derive(Debug, Clone, PartialEq)]
pub struct RatingValue {
    meta: ColumnMeta,
    value: Option<u8>,
}

impl RatingValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<u8> {
        self.value
    }

    pub fn set_rating(&mut self, rating: i64) -> Result<(), ColumnValueError> {
        match u8::try_from(rating) {
            Ok(r) if (1..=MAX_RATING).contains(&r) => {
                self.value = Some(r);
                Ok(())
            }
            _ => Err(self.meta.error_desc(
                format!("integer {}", rating),
                ColumnValueErrorKind::OutOfRange(format!("rating must be 1 to {}", MAX_RATING)),
            )),
        }
    }

    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl ColumnVariant for RatingValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Rating
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
                ColumnValueErrorKind::Malformed("expected {\"rating\": n}".into()),
            )),
        }
    }

    /// Accepts `null`, an integer, a numeric string, or the wire object;
    /// a rating of 0 clears the value
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        let not_numeric = || self.meta.error(&input, ColumnValueErrorKind::NotNumeric);
        let rating = match &input {
            Value::Null => None,
            Value::Number(n) => Some(n.as_i64().ok_or_else(not_numeric)?),
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.trim().parse::<i64>().map_err(|_| not_numeric())?),
            Value::Object(object) => match object.get("rating") {
                None | Some(Value::Null) => None,
                Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(not_numeric)?),
                Some(_) => return Err(not_numeric()),
            },
            Value::Bool(_) | Value::Array(_) => return Err(not_numeric()),
        };

        match rating {
            None | Some(0) => {
                self.value = None;
                Ok(())
            }
            Some(rating) => self.set_rating(rating),
        }
    }

    fn format(&self) -> Value {
        match self.value {
            Some(rating) => json!({ "rating": rating }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        self.value.map_or(Value::Null, |r| json!(r))
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
