//! Status column value
//!
//! The API stores a status as `{"index": <n>}`; the label comes from the
//! column's settings. A status read before its settings arrive is held as
//! [`StatusState::Unvalidated`] until [`ColumnVariant::apply_settings`]
//! resolves it.

use serde_json::{json, Value};

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};
use crate::domain::settings::{LabelRef, StatusSettings};

/// Resolution state of a status value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusState {
    #[default]
    Unset,
    /// Index read from the API, label not yet known
    Unvalidated { index: i64 },
    /// Index resolved against the settings
    Validated { index: i64, label: String },
}

/// A status column
#[derive(Debug, Clone, PartialEq)]
pub struct StatusValue {
    meta: ColumnMeta,
    settings: Option<StatusSettings>,
    state: StatusState,
}

impl StatusValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self {
            meta,
            settings: None,
            state: StatusState::Unset,
        }
    }

    /// Returns the resolved label
    pub fn value(&self) -> Option<&str> {
        match &self.state {
            StatusState::Validated { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Returns the index, resolved or not
    pub fn index(&self) -> Option<i64> {
        match &self.state {
            StatusState::Unset => None,
            StatusState::Unvalidated { index } | StatusState::Validated { index, .. } => {
                Some(*index)
            }
        }
    }

    pub fn state(&self) -> &StatusState {
        &self.state
    }

    pub fn settings(&self) -> Option<&StatusSettings> {
        self.settings.as_ref()
    }

    /// Selects a label by index or text
    pub fn set_label(&mut self, label: impl Into<LabelRef>) -> Result<(), ColumnValueError> {
        let label = label.into();
        let original = match &label {
            LabelRef::Index(index) => json!(index),
            LabelRef::Label(text) => json!(text),
        };
        self.state = self.resolve(&label, &original)?;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.state = StatusState::Unset;
    }

    fn resolve(&self, label: &LabelRef, original: &Value) -> Result<StatusState, ColumnValueError> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| self.meta.error(original, ColumnValueErrorKind::SettingsRequired))?;

        match settings.resolve(label) {
            Some((index, text)) => Ok(StatusState::Validated {
                index,
                label: text.to_string(),
            }),
            None => {
                let kind = match label {
                    LabelRef::Index(index) => ColumnValueErrorKind::UnknownIndex(*index),
                    LabelRef::Label(text) => ColumnValueErrorKind::UnknownLabel(text.clone()),
                };
                Err(self.meta.error(original, kind))
            }
        }
    }

    /// Computes the state an index takes under the given settings
    fn state_for_index(
        &self,
        index: i64,
        settings: Option<&StatusSettings>,
    ) -> Result<StatusState, ColumnValueError> {
        match settings {
            None => Ok(StatusState::Unvalidated { index }),
            Some(settings) => settings
                .label(index)
                .map(|label| StatusState::Validated {
                    index,
                    label: label.to_string(),
                })
                .ok_or_else(|| {
                    self.meta
                        .error(&json!({ "index": index }), ColumnValueErrorKind::UnknownIndex(index))
                }),
        }
    }
}

impl ColumnVariant for StatusValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Status
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.state = StatusState::Unset;
            return Ok(());
        }

        let json = self.meta.parse_raw(raw)?;
        let malformed = || {
            self.meta.error(
                &json,
                ColumnValueErrorKind::Malformed("expected {\"index\": <integer>}".into()),
            )
        };
        let index = match &json {
            Value::Object(object) => match object.get("index") {
                None | Some(Value::Null) => None,
                Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(malformed)?),
                Some(Value::String(s)) => Some(s.trim().parse::<i64>().map_err(|_| malformed())?),
                Some(_) => return Err(malformed()),
            },
            _ => return Err(malformed()),
        };

        self.state = match index {
            Some(index) => self.state_for_index(index, self.settings.as_ref())?,
            None => StatusState::Unset,
        };
        Ok(())
    }

    /// Accepts `null`, an integer index or a label (numeric strings are
    /// tried as an index when no label matches)
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        if input.is_null() {
            self.state = StatusState::Unset;
            return Ok(());
        }

        let label = LabelRef::from_json(&input).ok_or_else(|| {
            self.meta.error(
                &input,
                ColumnValueErrorKind::Invalid("expected a label index or label text".into()),
            )
        })?;
        self.state = self.resolve(&label, &input)?;
        Ok(())
    }

    fn format(&self) -> Value {
        match self.index() {
            Some(index) => json!({ "index": index }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        self.value().map_or(Value::Null, |label| json!(label))
    }

    fn is_empty(&self) -> bool {
        self.state == StatusState::Unset
    }

    fn apply_settings(&mut self, settings_str: Option<&str>) -> Result<(), ColumnValueError> {
        let settings = settings_str
            .map(StatusSettings::parse)
            .transpose()
            .map_err(|e| {
                self.meta.error_desc(
                    format!("settings {:?}", settings_str.unwrap_or_default()),
                    ColumnValueErrorKind::Malformed(e.to_string()),
                )
            })?;

        let state = match self.index() {
            Some(index) => self.state_for_index(index, settings.as_ref())?,
            None => StatusState::Unset,
        };

        tracing::debug!(column = self.meta.id(), state = ?state, "re-resolved status");
        self.settings = settings;
        self.state = state;
        Ok(())
    }
}
