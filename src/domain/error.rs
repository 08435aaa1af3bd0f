//! Error taxonomy for column values
//!
//! Every variant reports rejected input through [`ColumnValueError`], whether
//! the input came from the API (raw decode) or from a caller (assignment).
//! [`Error`] is the crate-level error for everything around the variants:
//! unknown type tags and board-level lookups. Bad settings strings surface as
//! a [`ColumnValueError`] with a malformed kind.

use serde_json::Value;
use thiserror::Error;

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level errors
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Unsupported column type: '{0}'")]
    UnsupportedColumnType(String),

    #[error(transparent)]
    ColumnValue(#[from] ColumnValueError),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Column '{0}' appears more than once in the payload")]
    DuplicateColumn(String),
}

/// What was wrong with a rejected value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ColumnValueErrorKind {
    #[error("malformed value: {0}")]
    Malformed(String),

    #[error("cannot set to composite type")]
    Composite,

    #[error("value is not a number")]
    NotNumeric,

    #[error("value is out of range: {0}")]
    OutOfRange(String),

    #[error("value does not match the format '{0}'")]
    InvalidFormat(String),

    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    #[error("unknown label index {0}")]
    UnknownIndex(i64),

    #[error("settings are required before a value can be assigned")]
    SettingsRequired,

    #[error("invalid kind '{0}', expected 'person' or 'team'")]
    InvalidKind(String),

    #[error("{0}")]
    Invalid(String),
}

/// A rejected parse, assignment or mutation on a single column value
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Column '{title}' ({id}): {kind} (got {value})")]
pub struct ColumnValueError {
    /// Column id of the value that rejected the input
    pub id: String,
    /// Column title of the value that rejected the input
    pub title: String,
    /// Short rendering of the offending input, prefixed by its type
    pub value: String,
    pub kind: ColumnValueErrorKind,
}

impl ColumnValueError {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        value: impl Into<String>,
        kind: ColumnValueErrorKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            value: value.into(),
            kind,
        }
    }
}

const MAX_DESCRIBED_LEN: usize = 64;

/// Renders a JSON value as `<type> <value>` for error messages
pub fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => return "null".to_string(),
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };

    let mut rendered = value.to_string();
    if rendered.chars().count() > MAX_DESCRIBED_LEN {
        rendered = rendered.chars().take(MAX_DESCRIBED_LEN).collect();
        rendered.push_str("...");
    }
    format!("{} {}", kind, rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_display_names_column_and_value() {
        let err = ColumnValueError::new(
            "status_1",
            "Status",
            describe(&json!("Not Done")),
            ColumnValueErrorKind::UnknownLabel("Not Done".into()),
        );
        let msg = err.to_string();

        assert!(msg.contains("'Status'"));
        assert!(msg.contains("status_1"));
        assert!(msg.contains("unknown label 'Not Done'"));
        assert!(msg.contains("string \"Not Done\""));
    }

    #[test]
    fn describe_names_json_types() {
        assert_eq!(describe(&json!(null)), "null");
        assert_eq!(describe(&json!(12)), "integer 12");
        assert_eq!(describe(&json!(1.5)), "float 1.5");
        assert_eq!(describe(&json!(true)), "boolean true");
        assert!(describe(&json!({"value": 1})).starts_with("object"));
    }

    #[test]
    fn describe_truncates_long_values() {
        let long = "x".repeat(200);
        let described = describe(&json!(long));
        assert!(described.ends_with("..."));
        assert!(described.len() < 100);
    }

    #[test]
    fn column_value_error_converts_into_crate_error() {
        let err: Error = ColumnValueError::new(
            "numbers",
            "Numbers",
            "string \"abc\"",
            ColumnValueErrorKind::NotNumeric,
        )
        .into();
        assert!(matches!(err, Error::ColumnValue(_)));
    }
}
