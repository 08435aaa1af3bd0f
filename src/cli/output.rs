//! Output formatting for CLI commands

use serde::Serialize;

pub use crate::config::OutputFormat;

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
    pretty: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            pretty: true,
        }
    }

    /// Sets whether JSON output is pretty-printed
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Prints structured data as JSON
    pub fn data<T: Serialize>(&self, data: &T) {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        if let Ok(json) = rendered {
            println!("{}", json);
        }
    }

    /// Prints a `label: value` line (text only)
    pub fn field(&self, label: &str, value: &str) {
        if self.is_text() {
            println!("{}: {}", label, value);
        }
    }

    /// Prints a table row (text only, ignored in JSON mode)
    pub fn row(&self, columns: &[&str]) {
        if self.is_text() {
            println!("{}", columns.join("\t"));
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Returns true if using text format
    pub fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
