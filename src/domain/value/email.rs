//! Email column value
//!
//! Wire shape: `{"email": "a@b.com", "text": "display text"}`

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{is_blank_raw, optional_str, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

/// An email address with its display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub email: String,
    pub text: String,
}

impl Email {
    /// Creates an email whose display text is the address itself
    pub fn new(email: impl Into<String>) -> Self {
        let email = email.into();
        Self {
            text: email.clone(),
            email,
        }
    }

    pub fn with_text(email: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            text: text.into(),
        }
    }
}

/// Checks for exactly one `@` with something on both sides
fn is_valid_address(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => !local.is_empty() && !domain.is_empty(),
        _ => false,
    }
}

/// An email column
#[derive(Debug, Clone, PartialEq)]
pub struct EmailValue {
    meta: ColumnMeta,
    value: Option<Email>,
}

impl EmailValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self { meta, value: None }
    }

    pub fn value(&self) -> Option<&Email> {
        self.value.as_ref()
    }

    pub fn set_email(&mut self, email: Email) -> Result<(), ColumnValueError> {
        if !is_valid_address(&email.email) {
            return Err(self.meta.error_desc(
                format!("string {:?}", email.email),
                ColumnValueErrorKind::InvalidFormat("expected an email address".into()),
            ));
        }
        self.value = Some(email);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    fn from_object(
        &self,
        input: &Value,
        object: &Map<String, Value>,
    ) -> Result<Option<Email>, ColumnValueError> {
        match optional_str(object, "email") {
            None if optional_str(object, "text").is_none() => Ok(None),
            None => Err(self.meta.error(
                input,
                ColumnValueErrorKind::Malformed("missing 'email'".into()),
            )),
            Some(email) => {
                let text = optional_str(object, "text").unwrap_or(email);
                Ok(Some(Email::with_text(email, text)))
            }
        }
    }
}

impl ColumnVariant for EmailValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::Email
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
                ColumnValueErrorKind::Malformed("expected {\"email\": ..., \"text\": ...}".into()),
            )),
        }
    }

    /// Accepts `null`, an address string, or the wire object
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        let email = match &input {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(Email::new(s.trim())),
            Value::Object(object) => self.from_object(&input, object)?,
            _ => {
                return Err(self.meta.error(
                    &input,
                    ColumnValueErrorKind::Invalid("expected an email address".into()),
                ))
            }
        };
        match email {
            Some(email) => self.set_email(email),
            None => {
                self.value = None;
                Ok(())
            }
        }
    }

    fn format(&self) -> Value {
        match &self.value {
            Some(email) => json!({ "email": email.email, "text": email.text }),
            None => json!({}),
        }
    }

    fn native(&self) -> Value {
        self.value.as_ref().map_or(Value::Null, |email| json!(email))
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}
