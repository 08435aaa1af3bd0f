//! Dropdown column value
//!
//! The API stores a dropdown as `{"ids": [1, 4]}`; labels come from the
//! column's settings. Selected labels keep insertion order and never repeat.

use serde_json::{json, Value};

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};
use crate::domain::settings::{DropdownLabel, DropdownSettings, LabelRef};

/// Resolution state of a dropdown value
///
/// The id and label lists are never empty; an empty selection is `Unset`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Unset,
    /// Ids read from the API, labels not yet known
    Unvalidated { ids: Vec<i64> },
    /// Labels resolved against the settings
    Validated { labels: Vec<DropdownLabel> },
}

/// A dropdown (multi-select) column
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownValue {
    meta: ColumnMeta,
    settings: Option<DropdownSettings>,
    state: DropdownState,
}

impl DropdownValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self {
            meta,
            settings: None,
            state: DropdownState::Unset,
        }
    }

    /// Returns the selected label names, empty until resolved
    pub fn value(&self) -> Vec<&str> {
        self.labels().iter().map(|l| l.name.as_str()).collect()
    }

    /// Returns the selected labels, empty until resolved
    pub fn labels(&self) -> &[DropdownLabel] {
        match &self.state {
            DropdownState::Validated { labels } => labels,
            _ => &[],
        }
    }

    /// Returns the selected ids, resolved or not
    pub fn ids(&self) -> Vec<i64> {
        match &self.state {
            DropdownState::Unset => Vec::new(),
            DropdownState::Unvalidated { ids } => ids.clone(),
            DropdownState::Validated { labels } => labels.iter().map(|l| l.id).collect(),
        }
    }

    pub fn state(&self) -> &DropdownState {
        &self.state
    }

    pub fn settings(&self) -> Option<&DropdownSettings> {
        self.settings.as_ref()
    }

    pub fn len(&self) -> usize {
        state_len(&self.state)
    }

    pub fn contains(&self, label: impl Into<LabelRef>) -> bool {
        let label = label.into();
        match &self.state {
            DropdownState::Unset => false,
            DropdownState::Unvalidated { ids } => {
                matches!(label, LabelRef::Index(id) if ids.contains(&id))
            }
            DropdownState::Validated { labels } => labels.iter().any(|l| match &label {
                LabelRef::Index(id) => l.id == *id,
                LabelRef::Label(name) => &l.name == name,
            }),
        }
    }

    /// Adds a label by id or name
    ///
    /// Returns false if the label was already selected.
    pub fn push(&mut self, label: impl Into<LabelRef>) -> Result<bool, ColumnValueError> {
        let label = label.into();
        let original = label_json(&label);
        let resolved = self.resolve(&label, &original)?;

        let mut labels = self.resolved_labels(&original)?;
        if labels.iter().any(|l| l.id == resolved.id) {
            return Ok(false);
        }
        labels.push(resolved);
        self.state = DropdownState::Validated { labels };
        Ok(true)
    }

    /// Removes a label by id or name
    ///
    /// Returns false if the label was not selected.
    pub fn remove(&mut self, label: impl Into<LabelRef>) -> bool {
        let label = label.into();
        let before = self.len();
        match &mut self.state {
            DropdownState::Unset => {}
            DropdownState::Unvalidated { ids } => {
                if let LabelRef::Index(id) = label {
                    ids.retain(|i| *i != id);
                }
            }
            DropdownState::Validated { labels } => labels.retain(|l| match &label {
                LabelRef::Index(id) => l.id != *id,
                LabelRef::Label(name) => &l.name != name,
            }),
        }
        let removed = self.len() != before;
        if self.len() == 0 {
            self.state = DropdownState::Unset;
        }
        removed
    }

    pub fn clear(&mut self) {
        self.state = DropdownState::Unset;
    }

    /// Replaces the selection; either every label resolves or nothing changes
    pub fn set_labels<I, L>(&mut self, labels: I) -> Result<(), ColumnValueError>
    where
        I: IntoIterator<Item = L>,
        L: Into<LabelRef>,
    {
        let mut resolved: Vec<DropdownLabel> = Vec::new();
        for label in labels {
            let label = label.into();
            let label = self.resolve(&label, &label_json(&label))?;
            if !resolved.iter().any(|l| l.id == label.id) {
                resolved.push(label);
            }
        }
        self.state = state_from_labels(resolved);
        Ok(())
    }

    fn resolve(&self, label: &LabelRef, original: &Value) -> Result<DropdownLabel, ColumnValueError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| self.meta.error(original, ColumnValueErrorKind::SettingsRequired))?;

        settings.resolve(label).cloned().ok_or_else(|| {
            let kind = match label {
                LabelRef::Index(id) => ColumnValueErrorKind::UnknownIndex(*id),
                LabelRef::Label(name) => ColumnValueErrorKind::UnknownLabel(name.clone()),
            };
            self.meta.error(original, kind)
        })
    }

    /// Returns the current selection as resolved labels
    fn resolved_labels(&self, original: &Value) -> Result<Vec<DropdownLabel>, ColumnValueError> {
        match &self.state {
            DropdownState::Unset => Ok(Vec::new()),
            DropdownState::Validated { labels } => Ok(labels.clone()),
            DropdownState::Unvalidated { ids } => ids
                .iter()
                .map(|id| self.resolve(&LabelRef::Index(*id), original))
                .collect(),
        }
    }

    /// Computes the state a list of ids takes under the given settings
    fn state_for_ids(
        &self,
        ids: Vec<i64>,
        settings: Option<&DropdownSettings>,
    ) -> Result<DropdownState, ColumnValueError> {
        let mut unique: Vec<i64> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return Ok(DropdownState::Unset);
        }

        let Some(settings) = settings else {
            return Ok(DropdownState::Unvalidated { ids: unique });
        };
        let labels = unique
            .iter()
            .map(|id| {
                settings.by_id(*id).cloned().ok_or_else(|| {
                    self.meta
                        .error(&json!({ "ids": unique }), ColumnValueErrorKind::UnknownIndex(*id))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DropdownState::Validated { labels })
    }

    fn decode_ids(&self, ids: &Value) -> Result<Vec<i64>, ColumnValueError> {
        let malformed = || {
            self.meta.error(
                ids,
                ColumnValueErrorKind::Malformed("expected a list of integer ids".into()),
            )
        };
        match ids {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => n.as_i64().ok_or_else(malformed),
                    Value::String(s) => s.trim().parse::<i64>().map_err(|_| malformed()),
                    _ => Err(malformed()),
                })
                .collect(),
            _ => Err(malformed()),
        }
    }
}

fn label_json(label: &LabelRef) -> Value {
    match label {
        LabelRef::Index(id) => json!(id),
        LabelRef::Label(name) => json!(name),
    }
}

fn state_from_labels(labels: Vec<DropdownLabel>) -> DropdownState {
    if labels.is_empty() {
        DropdownState::Unset
    } else {
        DropdownState::Validated { labels }
    }
}

impl ColumnVariant for DropdownValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Dropdown
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.state = DropdownState::Unset;
            return Ok(());
        }

        let json = self.meta.parse_raw(raw)?;
        let ids = match &json {
            Value::Object(object) => self.decode_ids(object.get("ids").unwrap_or(&Value::Null))?,
            _ => {
                return Err(self.meta.error(
                    &json,
                    ColumnValueErrorKind::Malformed("expected {\"ids\": [...]}".into()),
                ))
            }
        };
        self.state = self.state_for_ids(ids, self.settings.as_ref())?;
        Ok(())
    }

    /// Accepts `null`, a single id or label, a list of ids and labels, or
    /// the `{"ids": [...]}` wire object
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        match input {
            Value::Null => {
                self.state = DropdownState::Unset;
                Ok(())
            }
            Value::Array(items) => {
                let labels = items
                    .iter()
                    .map(|item| {
                        LabelRef::from_json(item).ok_or_else(|| {
                            self.meta.error(
                                item,
                                ColumnValueErrorKind::Invalid("expected a label id or name".into()),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.set_labels(labels)
            }
            Value::Object(ref object) if object.contains_key("ids") => {
                let ids = self.decode_ids(&object["ids"])?;
                self.set_labels(ids)
            }
            other => match LabelRef::from_json(&other) {
                Some(label) => self.set_labels([label]),
                None => Err(self.meta.error(
                    &other,
                    ColumnValueErrorKind::Invalid("expected a label id, name or list".into()),
                )),
            },
        }
    }

    fn format(&self) -> Value {
        match &self.state {
            DropdownState::Unset => json!({}),
            _ => json!({ "ids": self.ids() }),
        }
    }

    fn native(&self) -> Value {
        json!(self.value())
    }

    fn is_empty(&self) -> bool {
        self.state == DropdownState::Unset
    }

    fn apply_settings(&mut self, settings_str: Option<&str>) -> Result<(), ColumnValueError> {
        let settings = settings_str
            .map(DropdownSettings::parse)
            .transpose()
            .map_err(|e| {
                self.meta.error_desc(
                    format!("settings {:?}", settings_str.unwrap_or_default()),
                    ColumnValueErrorKind::Malformed(e.to_string()),
                )
            })?;

        let state = self.state_for_ids(self.ids(), settings.as_ref())?;

        tracing::debug!(column = self.meta.id(), selected = state_len(&state), "re-resolved dropdown");
        self.settings = settings;
        self.state = state;
        Ok(())
    }
}

fn state_len(state: &DropdownState) -> usize {
    match state {
        DropdownState::Unset => 0,
        DropdownState::Unvalidated { ids } => ids.len(),
        DropdownState::Validated { labels } => labels.len(),
    }
}
