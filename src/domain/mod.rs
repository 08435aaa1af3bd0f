//! Domain models for column values
//!
//! Pure parsing, validation and formatting with no I/O concerns.

mod board;
mod column_type;
mod error;
mod settings;
pub mod value;

pub use board::{column_values_payload, search_value, Column, ColumnCatalog, ColumnRef};
pub use column_type::{ColumnType, SettingsSchema};
pub use error::{describe, ColumnValueError, ColumnValueErrorKind, Error, Result};
pub use settings::{DropdownLabel, DropdownSettings, LabelRef, SettingsError, StatusSettings};
pub use value::{
    create_column_value, create_column_value_from_tag, ColumnMeta, ColumnValue, ColumnVariant,
};
