//! # Command-Line Interface
//!
//! The `mcol` binary: inspect and exercise column values from the shell.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `types` | List column types, their platform tags and settings needs |
//! | `decode` | Decode a raw API value and show its native and wire forms |
//! | `set` | Assign an input through a column's conversion table |
//! | `payload` | Build the `column_values` payload for an item mutation |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default comes from `default_format` in the config file.
//!
//! ## Verbose Mode
//!
//! `--verbose` (or `-v`) prints progress on stderr and raises the log level
//! to `debug` unless `RUST_LOG` is set.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod column_cmd;
mod output;

pub use app::{run, Cli, ColumnOpts, Commands};
pub use output::{Output, OutputFormat};
