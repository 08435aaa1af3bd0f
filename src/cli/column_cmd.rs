//! Column value commands (types, decode, set, payload)

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use super::output::Output;
use crate::domain::{
    column_values_payload, create_column_value, search_value, Column, ColumnCatalog, ColumnRef,
    ColumnType, ColumnValue,
};

/// Identity and raw state shared by `decode` and `set`
pub struct ColumnArgs<'a> {
    pub column_type: &'a str,
    pub id: &'a str,
    pub title: &'a str,
    pub value: Option<&'a str>,
    pub settings: Option<&'a str>,
}

impl ColumnArgs<'_> {
    fn build(&self, output: &Output) -> Result<ColumnValue> {
        let column_type: ColumnType = self.column_type.parse()?;
        output.verbose_ctx(
            "column",
            &format!(
                "Building {} column '{}' (value: {}, settings: {})",
                column_type,
                self.id,
                self.value.is_some(),
                self.settings.is_some()
            ),
        );
        Ok(create_column_value(
            column_type,
            self.id,
            self.title,
            self.value,
            self.settings,
        )?)
    }
}

/// List supported column types
pub fn types(output: &Output) -> Result<()> {
    if output.is_json() {
        let items: Vec<_> = ColumnType::all()
            .iter()
            .map(|t| {
                json!({
                    "name": t.as_str(),
                    "api_types": t.api_types(),
                    "settings": t.settings_schema(),
                })
            })
            .collect();
        output.data(&items);
    } else {
        println!("{:<12} {:<28} SETTINGS", "TYPE", "API TAGS");
        println!("{}", "-".repeat(56));
        for column_type in ColumnType::all() {
            let settings = if column_type.requires_settings() {
                "required"
            } else {
                "-"
            };
            println!(
                "{:<12} {:<28} {}",
                column_type.as_str(),
                column_type.api_types().join(", "),
                settings
            );
        }
    }

    Ok(())
}

/// Decode a raw API value and show its native and wire forms
pub fn decode(output: &Output, args: &ColumnArgs<'_>) -> Result<()> {
    let column_value = args.build(output)?;
    show(output, &column_value);
    Ok(())
}

/// Assign an input through the column's conversion table
///
/// Input that is not valid JSON is taken as a plain string, so
/// `mcol set text hello` works without quoting.
pub fn set(output: &Output, args: &ColumnArgs<'_>, input: &str) -> Result<()> {
    let mut column_value = args.build(output)?;

    let input = serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()));
    output.verbose_ctx("set", &format!("Assigning {}", input));
    column_value.set(input)?;

    show(output, &column_value);
    Ok(())
}

fn show(output: &Output, column_value: &ColumnValue) {
    if output.is_json() {
        output.data(&json!({
            "id": column_value.id(),
            "title": column_value.title(),
            "type": column_value.column_type(),
            "empty": column_value.is_empty(),
            "value": column_value.value(),
            "format": column_value.format(),
            "search": search_value(column_value),
        }));
    } else {
        output.field("type", column_value.column_type().as_str());
        output.field("value", &column_value.value().to_string());
        output.field("format", &column_value.format().to_string());
        output.field("search", &search_value(column_value).to_string());
    }
}

/// A column listing entry with the input to assign to it
#[derive(Debug, Deserialize)]
struct PayloadEntry {
    #[serde(flatten)]
    column: Column,
    #[serde(default)]
    value: Option<Value>,
}

/// Build the `column_values` payload for an item mutation
pub fn payload(output: &Output, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read column file: {}", path.display()))?;
    let entries: Vec<PayloadEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse column file: {}", path.display()))?;
    output.verbose_ctx("payload", &format!("Read {} columns", entries.len()));

    let catalog = ColumnCatalog::new(entries.iter().map(|e| e.column.clone()).collect());

    let mut values = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut column_value = catalog.get_column_value(&ColumnRef::Id(entry.column.id))?;
        if let Some(input) = entry.value {
            column_value.set(input)?;
        }
        values.push(column_value);
    }

    let payload = column_values_payload(&values)?;
    if output.is_json() {
        output.data(&payload);
    } else {
        for (id, value) in &payload {
            let rendered = value.to_string();
            output.row(&[id.as_str(), rendered.as_str()]);
        }
    }

    Ok(())
}
