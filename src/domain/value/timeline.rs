//! Timeline column value
//!
//! Wire shape: `{"from": "YYYY-MM-DD", "to": "YYYY-MM-DD"}`

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use super::{is_blank_raw, optional_str, ColumnMeta, ColumnVariant, DATE_FORMAT};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// An inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeline {
    from: NaiveDate,
    to: NaiveDate,
}

impl Timeline {
    /// Creates a range, returning `None` if `from` is after `to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of days covered, counting both ends
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// A timeline column
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineValue {
    meta: ColumnMeta,
    value: Option<Timeline>,
}

impl TimelineValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<Timeline> {
        self.value
    }

    /// Stores a range, rejecting one that ends before it starts
    pub fn set_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<(), ColumnValueError> {
        let timeline = Timeline::new(from, to).ok_or_else(|| {
            self.meta.error_desc(
                format!("range {} to {}", from, to),
                ColumnValueErrorKind::OutOfRange("'from' is after 'to'".into()),
            )
        })?;
        self.value = Some(timeline);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    fn parse_date(&self, input: &Value, date: &str) -> Result<NaiveDate, ColumnValueError> {
        NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
            self.meta.error(
                input,
                ColumnValueErrorKind::InvalidFormat(format!("expected YYYY-MM-DD, got {:?}", date)),
            )
        })
    }

    fn set_object(
        &mut self,
        input: &Value,
        object: &Map<String, Value>,
    ) -> Result<(), ColumnValueError> {
        match (optional_str(object, "from"), optional_str(object, "to")) {
            (None, None) => {
                self.value = None;
                Ok(())
            }
            (Some(from), Some(to)) => {
                let from = self.parse_date(input, from)?;
                let to = self.parse_date(input, to)?;
                self.set_range(from, to)
            }
            _ => Err(self.meta.error(
                input,
                ColumnValueErrorKind::Malformed("both 'from' and 'to' are required".into()),
            )),
        }
    }
}

impl ColumnVariant for TimelineValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Timeline
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
                ColumnValueErrorKind::Malformed("expected {\"from\": ..., \"to\": ...}".into()),
            )),
        }
    }

    /// Accepts `null`, the wire object, or a `[from, to]` pair of date strings
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        match &input {
            Value::Null => {
                self.value = None;
                Ok(())
            }
            Value::Object(object) => self.set_object(&input, object),
            Value::Array(pair) => match pair.as_slice() {
                [Value::String(from), Value::String(to)] => {
                    let from = self.parse_date(&input, from)?;
                    let to = self.parse_date(&input, to)?;
                    self.set_range(from, to)
                }
                _ => Err(self.meta.error(
                    &input,
                    ColumnValueErrorKind::Invalid("expected two dates".into()),
                )),
            },
            _ => Err(self.meta.error(
                &input,
                ColumnValueErrorKind::Invalid("expected a date range".into()),
            )),
        }
    }

    fn format(&self) -> Value {
        match self.value {
            Some(timeline) => json!({
                "from": timeline.from.format(DATE_FORMAT).to_string(),
                "to": timeline.to.format(DATE_FORMAT).to_string(),
            }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        if self.value.is_some() {
            self.format()
        } else {
            Value::Null
        }
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
