//! Numbers column value

use serde_json::Value;

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// A numeric column, stored as `f64`
///
/// The API sends and accepts numbers as strings (`"123"`, `"123.32"`).
#[derive(Debug, Clone, PartialEq)]
pub struct NumbersValue {
    meta: ColumnMeta,
    value: Option<f64>,
}

impl NumbersValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Sets a number; NaN and infinities are rejected
    pub fn set_number(&mut self, number: f64) -> Result<(), ColumnValueError> {
        if !number.is_finite() {
            return Err(self.meta.error_desc(
                format!("float {}", number),
                ColumnValueErrorKind::NotNumeric,
            ));
        }
        self.value = Some(number);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    fn parse_number(&self, text: &str, original: &Value) -> Result<f64, ColumnValueError> {
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| self.meta.error(original, ColumnValueErrorKind::NotNumeric))
    }
}

impl ColumnVariant for NumbersValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Numbers
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    /// Accepts a bare numeric string (`123`) or a JSON-encoded one (`"123"`)
    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.value = None;
            return Ok(());
        }

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::String(s)) if s.trim().is_empty() => {
                self.value = None;
                Ok(())
            }
            Ok(json @ (Value::String(_) | Value::Number(_))) => self.set(json),
            _ => {
                let original = Value::String(raw.to_string());
                let number = self.parse_number(raw, &original)?;
                self.value = Some(number);
                Ok(())
            }
        }
    }

    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        match &input {
            Value::Null => {
                self.value = None;
                Ok(())
            }
            Value::Number(n) => match n.as_f64() {
                Some(number) => self.set_number(number),
                None => Err(self.meta.error(&input, ColumnValueErrorKind::NotNumeric)),
            },
            Value::String(s) => {
                let number = self.parse_number(s, &input)?;
                self.value = Some(number);
                Ok(())
            }
            Value::Bool(_) => Err(self.meta.error(&input, ColumnValueErrorKind::NotNumeric)),
            Value::Array(_) | Value::Object(_) => {
                Err(self.meta.error(&input, ColumnValueErrorKind::Composite))
            }
        }
    }

    /// Integral values format without a fractional part (`123.0` → `"123"`)
    fn format(&self) -> Value {
        Value::String(self.value.map(|n| n.to_string()).unwrap_or_default())
    }

    fn native(&self) -> Value {
        self.value
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbers() -> NumbersValue {
        NumbersValue::new(ColumnMeta::new("value_1", "value"))
    }

    #[test]
    fn empty_numbers_format_as_empty_string() {
        assert_eq!(numbers().format(), json!(""));
    }

    #[test]
    fn loads_bare_numeric_string() {
        let mut value = numbers();
        value.load("123").unwrap();

        assert_eq!(value.value(), Some(123.0));
        assert_eq!(value.format(), json!("123"));
    }

    #[test]
    fn loads_json_encoded_numeric_string() {
        let mut value = numbers();
        value.load(r#""123.32""#).unwrap();
        assert_eq!(value.value(), Some(123.32));
        assert_eq!(value.format(), json!("123.32"));
    }

    #[test]
    fn loads_empty_string_as_none() {
        let mut value = numbers();
        value.load(r#""""#).unwrap();
        assert_eq!(value.value(), None);
    }

    #[test]
    fn setting_null_clears() {
        let mut value = numbers();
        value.set(json!(5)).unwrap();
        value.set(Value::Null).unwrap();
        assert_eq!(value.value(), None);
    }

    #[test]
    fn int_and_float_are_stored_as_is() {
        let mut value = numbers();

        value.set(json!(123.32)).unwrap();
        assert_eq!(value.value(), Some(123.32));

        value.set(json!(42)).unwrap();
        assert_eq!(value.value(), Some(42.0));
    }

    #[test]
    fn numeric_string_is_converted() {
        let mut value = numbers();
        value.set(json!("123.32")).unwrap();
        assert_eq!(value.value(), Some(123.32));
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        let mut value = numbers();
        value.set(json!(7)).unwrap();

        let err = value.set(json!("just a number")).unwrap_err();
        assert_eq!(err.kind, ColumnValueErrorKind::NotNumeric);
        assert_eq!(value.value(), Some(7.0));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut value = numbers();
        assert!(value.set(json!("NaN")).is_err());
        assert!(value.set(json!("inf")).is_err());
        assert!(value.set_number(f64::INFINITY).is_err());
    }

    #[test]
    fn booleans_and_composites_are_rejected() {
        let mut value = numbers();
        assert_eq!(
            value.set(json!(true)).unwrap_err().kind,
            ColumnValueErrorKind::NotNumeric
        );
        assert_eq!(
            value.set(json!([1])).unwrap_err().kind,
            ColumnValueErrorKind::Composite
        );
    }

    #[test]
    fn garbage_raw_value_is_rejected() {
        let mut value = numbers();
        assert!(value.load("twelve").is_err());
    }
}
