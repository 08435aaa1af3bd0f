//! moncli-columns - Typed column values for board-based work platforms
//!
//! A board's items carry one value per column. The API hands each value over
//! as a raw JSON string and expects writes in a type-specific wire shape.
//! This crate decodes those strings into typed values, validates every
//! assignment (status and dropdown labels against the column's settings), and
//! encodes values back for mutations.
//!
//! ```
//! use moncli_columns::{create_column_value, ColumnType};
//!
//! let settings = r#"{"labels": {"0": "Working on it", "1": "Done"}}"#;
//! let mut status =
//!     create_column_value(ColumnType::Status, "status", "Status", None, Some(settings)).unwrap();
//! status.set("Done").unwrap();
//! assert_eq!(status.format(), serde_json::json!({"index": 1}));
//! ```

pub mod cli;
pub mod config;
pub mod domain;

pub use domain::{
    column_values_payload, create_column_value, create_column_value_from_tag, search_value,
    Column, ColumnCatalog, ColumnRef, ColumnType, ColumnValue, ColumnValueError,
    ColumnValueErrorKind, Error,
};
