//! Link column value
//!
//! Wire shape: `{"url": "https://...", "text": "display text"}`

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{is_blank_raw, optional_str, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

const SCHEMES: [&str; 2] = ["http://", "https://"];

/// A URL with its display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: String,
}

impl Link {
    /// Creates a link whose display text is the URL itself
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            text: url.clone(),
            url,
        }
    }

    pub fn with_text(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            text: text.into(),
        }
    }
}

/// A link column
#[derive(Debug, Clone, PartialEq)]
pub struct LinkValue {
    meta: ColumnMeta,
    value: Option<Link>,
}

impl LinkValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<&Link> {
        self.value.as_ref()
    }

    pub fn set_link(&mut self, link: Link) -> Result<(), ColumnValueError> {
        let has_scheme = SCHEMES
            .iter()
            .any(|scheme| link.url.len() > scheme.len() && link.url.starts_with(scheme));
        if !has_scheme {
            return Err(self.meta.error_desc(
                format!("string {:?}", link.url),
                ColumnValueErrorKind::InvalidFormat("expected an http(s) URL".into()),
            ));
        }
        self.value = Some(link);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    fn from_object(
        &self,
        input: &Value,
        object: &Map<String, Value>,
    ) -> Result<Option<Link>, ColumnValueError> {
        match optional_str(object, "url") {
            None if optional_str(object, "text").is_none() => Ok(None),
            None => Err(self.meta.error(
                input,
                ColumnValueErrorKind::Malformed("missing 'url'".into()),
            )),
            Some(url) => {
                let text = optional_str(object, "text").unwrap_or(url);
                Ok(Some(Link::with_text(url, text)))
            }
        }
    }
}

impl ColumnVariant for LinkValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Link
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
                ColumnValueErrorKind::Malformed("expected {\"url\": ..., \"text\": ...}".into()),
            )),
        }
    }

    /// Accepts `null`, a URL string, or the wire object
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        let link = match &input {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(Link::new(s.trim())),
            Value::Object(object) => self.from_object(&input, object)?,
            _ => {
                return Err(self.meta.error(
                    &input,
                    ColumnValueErrorKind::Invalid("expected a URL".into()),
                ))
            }
        };
        match link {
            Some(link) => self.set_link(link),
            None => {
                self.value = None;
                Ok(())
            }
        }
    }

    fn format(&self) -> Value {
        match &self.value {
            Some(link) => json!({ "url": link.url, "text": link.text }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        self.value.as_ref().map_or(Value::Null, |link| json!(link))
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
