//! Date column value
//!
//! Wire shape: `{"date": "YYYY-MM-DD", "time": "HH:MM:SS"}`, where `time` is
//! optional. Assignment accepts native chrono values, Unix timestamps and the
//! platform's simple `"YYYY-MM-DD HH:MM:SS"` string.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{json, Map, Value};

use super::{is_blank_raw, optional_str, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const SIMPLE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Years representable in the four-digit wire format
const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A date with an optional time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeValue {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

impl DateTimeValue {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.time
    }

    /// Combines date and time, using midnight for date-only values
    pub fn to_naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    /// Returns the date as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Returns the time as `HH:MM:SS`, if present
    pub fn time_string(&self) -> Option<String> {
        self.time.map(|t| t.format(TIME_FORMAT).to_string())
    }
}

impl From<NaiveDate> for DateTimeValue {
    fn from(date: NaiveDate) -> Self {
        Self::new(date, None)
    }
}

impl From<NaiveDateTime> for DateTimeValue {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::new(datetime.date(), Some(datetime.time()))
    }
}

/// A date column
#[derive(Debug, Clone, PartialEq)]
pub struct DateValue {
    meta: ColumnMeta,
    value: Option<DateTimeValue>,
}

impl DateValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<DateTimeValue> {
        self.value
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Stores a date and time directly
    pub fn set_datetime(&mut self, datetime: NaiveDateTime) -> Result<(), ColumnValueError> {
        self.set_checked(datetime.into(), || format!("datetime {}", datetime))
    }

    /// Stores a date without a time of day
    pub fn set_date(&mut self, date: NaiveDate) -> Result<(), ColumnValueError> {
        self.set_checked(date.into(), || format!("date {}", date))
    }

    /// Stores a Unix timestamp (seconds, UTC)
    ///
    /// The time is dropped when the timestamp falls exactly on midnight.
    pub fn set_timestamp(&mut self, timestamp: i64) -> Result<(), ColumnValueError> {
        let out_of_range = || {
            self.meta.error_desc(
                format!("integer {}", timestamp),
                ColumnValueErrorKind::OutOfRange("timestamp is not a representable date".into()),
            )
        };
        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(out_of_range)?
            .naive_utc();
        if !YEAR_RANGE.contains(&datetime.year()) {
            return Err(out_of_range());
        }

        let time = Some(datetime.time()).filter(|t| *t != NaiveTime::MIN);
        self.value = Some(DateTimeValue::new(datetime.date(), time));
        Ok(())
    }

    /// Parses the simple `"YYYY-MM-DD HH:MM:SS"` format
    pub fn set_str(&mut self, text: &str) -> Result<(), ColumnValueError> {
        let datetime = NaiveDateTime::parse_from_str(text.trim(), SIMPLE_DATETIME_FORMAT)
            .map_err(|_| {
                self.meta.error(
                    &Value::String(text.to_string()),
                    ColumnValueErrorKind::InvalidFormat(SIMPLE_DATETIME_FORMAT.into()),
                )
            })?;
        self.set_datetime(datetime)
    }

    fn set_checked(
        &mut self,
        value: DateTimeValue,
        describe: impl FnOnce() -> String,
    ) -> Result<(), ColumnValueError> {
        if !YEAR_RANGE.contains(&value.date.year()) {
            return Err(self.meta.error_desc(
                describe(),
                ColumnValueErrorKind::OutOfRange("year must be between 1 and 9999".into()),
            ));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Decodes `{"date": ..., "time": ...}`; a missing date means no value
    fn decode_object(&self, object: &Map<String, Value>) -> Result<Option<DateTimeValue>, ColumnValueError> {
        let original = || Value::Object(object.clone());

        let Some(date) = optional_str(object, "date") else {
            return Ok(None);
        };
        let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|_| {
            self.meta
                .error(&original(), ColumnValueErrorKind::InvalidFormat(DATE_FORMAT.into()))
        })?;

        let time = optional_str(object, "time")
            .map(|t| NaiveTime::parse_from_str(t.trim(), TIME_FORMAT))
            .transpose()
            .map_err(|_| {
                self.meta
                    .error(&original(), ColumnValueErrorKind::InvalidFormat(TIME_FORMAT.into()))
            })?;

        Ok(Some(DateTimeValue::new(date, time)))
    }
}

impl ColumnVariant for DateValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Date
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
            Value::Object(object) => self.set(Value::Object(object)),
            other => Err(self.meta.error(
                &other,
                ColumnValueErrorKind::Malformed("expected a date object".into()),
            )),
        }
    }

    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        match &input {
            Value::Null => {
                self.value = None;
                Ok(())
            }
            Value::Number(n) => match n.as_i64() {
                Some(timestamp) => self.set_timestamp(timestamp),
                None => Err(self.meta.error(
                    &input,
                    ColumnValueErrorKind::OutOfRange("timestamp must be a whole number of seconds".into()),
                )),
            },
            Value::String(s) => self.set_str(s),
            Value::Object(object) => match self.decode_object(object)? {
                Some(value) => self.set_checked(value, || input.to_string()),
                None => {
                    self.value = None;
                    Ok(())
                }
            },
            Value::Bool(_) | Value::Array(_) => Err(self.meta.error(
                &input,
                ColumnValueErrorKind::Invalid("expected a timestamp, date string or date object".into()),
            )),
        }
    }

    fn format(&self) -> Value {
        match &self.value {
            None => json!({}),
            Some(value) => {
                let mut object = Map::new();
                object.insert("date".into(), Value::String(value.date_string()));
                if let Some(time) = value.time_string() {
                    object.insert("time".into(), Value::String(time));
                }
                Value::Object(object)
            }
        }
    }

    fn native(&self) -> Value {
        match &self.value {
            None => Value::Null,
            Some(value) => match value.time {
                Some(_) => Value::String(value.to_naive().format(SIMPLE_DATETIME_FORMAT).to_string()),
                None => Value::String(value.date_string()),
            },
        }
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateValue {
        DateValue::new(ColumnMeta::new("date_1", "date"))
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .unwrap()
    }

    #[test]
    fn empty_date_formats_as_empty_object() {
        assert_eq!(date().format(), json!({}));
    }

    #[test]
    fn loads_date_and_time() {
        let mut value = date();
        value
            .load(r#"{"date": "2020-12-12", "time": "12:20:30"}"#)
            .unwrap();

        let format = value.format();
        assert_eq!(format["date"], "2020-12-12");
        assert_eq!(format["time"], "12:20:30");
    }

    #[test]
    fn loads_date_only() {
        let mut value = date();
        value
            .load(r#"{"date": "2021-03-04", "time": null, "changed_at": "2021-09-19T21:51:49.093Z"}"#)
            .unwrap();

        let loaded = value.value().unwrap();
        assert_eq!(loaded.time(), None);
        assert_eq!(value.format(), json!({"date": "2021-03-04"}));
    }

    #[test]
    fn rejects_malformed_date_object() {
        let mut value = date();
        assert!(value.load(r#"{"date": "12/12/2020"}"#).is_err());
        assert!(value.load(r#"{"date": "2020-12-12", "time": "noon"}"#).is_err());
        assert!(value.load(r#""2020-12-12""#).is_err());
    }

    #[test]
    fn setting_null_clears() {
        let mut value = date();
        value.set_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()).unwrap();
        value.set(Value::Null).unwrap();
        assert_eq!(value.value(), None);
    }

    #[test]
    fn native_datetime_is_stored_directly() {
        let mut value = date();
        let input = datetime(2020, 12, 12, 12, 30, 12);
        value.set_datetime(input).unwrap();

        assert_eq!(value.value().map(|v| v.to_naive()), Some(input));
    }

    #[test]
    fn valid_unix_timestamp() {
        let mut value = date();
        value.set(json!(9_999_999_999i64)).unwrap();

        let format = value.format();
        assert_eq!(format["date"], "2286-11-20");
        assert_eq!(format["time"], "17:46:39");
    }

    #[test]
    fn midnight_timestamp_drops_time() {
        let mut value = date();
        value.set_timestamp(1_609_459_200).unwrap();
        assert_eq!(value.format(), json!({"date": "2021-01-01"}));
    }

    #[test]
    fn out_of_range_unix_timestamp() {
        let mut value = date();
        let err = value.set(json!(999_999_999_999i64)).unwrap_err();

        assert!(matches!(err.kind, ColumnValueErrorKind::OutOfRange(_)));
        assert_eq!(value.value(), None);
    }

    #[test]
    fn simple_string_is_parsed() {
        let mut value = date();
        value.set(json!("2020-12-12 12:24:23")).unwrap();

        let format = value.format();
        assert_eq!(format["date"], "2020-12-12");
        assert_eq!(format["time"], "12:24:23");
    }

    #[test]
    fn malformed_simple_string_is_rejected() {
        let mut value = date();
        let err = value.set(json!("202020-120-120 123:234:233")).unwrap_err();
        assert!(matches!(err.kind, ColumnValueErrorKind::InvalidFormat(_)));

        assert!(value.set(json!("2020-12-12")).is_err());
    }

    #[test]
    fn booleans_and_arrays_are_rejected() {
        let mut value = date();
        assert!(value.set(json!(true)).is_err());
        assert!(value.set(json!([2020, 12, 12])).is_err());
    }

    #[test]
    fn format_round_trips_through_load() {
        let mut value = date();
        value.set_datetime(datetime(2022, 2, 28, 8, 0, 5)).unwrap();

        let mut reloaded = date();
        reloaded.load(&value.format().to_string()).unwrap();
        assert_eq!(reloaded.value(), value.value());
    }

    #[test]
    fn native_renders_simple_format() {
        let mut value = date();
        value.set_str("2020-12-12 12:24:23").unwrap();
        assert_eq!(value.native(), json!("2020-12-12 12:24:23"));

        value.set_date(NaiveDate::from_ymd_opt(2020, 12, 12).unwrap()).unwrap();
        assert_eq!(value.native(), json!("2020-12-12"));
    }
}
