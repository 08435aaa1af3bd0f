//! People column value
//!
//! Wire shape: `{"personsAndTeams": [{"id": 134, "kind": "person"}, ...]}`

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use super::{is_blank_raw, ColumnMeta, ColumnVariant};
use crate::domain::column_type::ColumnType;
use crate::domain::error::{ColumnValueError, ColumnValueErrorKind};

const PERSONS_AND_TEAMS: &str = "personsAndTeams";

/// Whether an entry refers to a single user or a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeopleKind {
    Person,
    Team,
}

impl PeopleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeopleKind::Person => "person",
            PeopleKind::Team => "team",
        }
    }
}

impl fmt::Display for PeopleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PeopleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(PeopleKind::Person),
            "team" => Ok(PeopleKind::Team),
            _ => Err(format!("Unknown people kind: {}", s)),
        }
    }
}

/// An assigned user or team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonOrTeam {
    pub id: i64,
    pub kind: PeopleKind,
}

impl PersonOrTeam {
    pub fn person(id: i64) -> Self {
        Self {
            id,
            kind: PeopleKind::Person,
        }
    }

    pub fn team(id: i64) -> Self {
        Self {
            id,
            kind: PeopleKind::Team,
        }
    }
}

/// A people column: an ordered list of users and teams
#[derive(Debug, Clone, PartialEq)]
pub struct PeopleValue {
    meta: ColumnMeta,
    value: Vec<PersonOrTeam>,
}

impl PeopleValue {
    pub fn new(meta: ColumnMeta) -> Self {
        Self {
            meta,
            value: Vec::new(),
        }
    }

    pub fn value(&self) -> &[PersonOrTeam] {
        &self.value
    }

    /// Adds an entry; returns false if it was already assigned
    pub fn push(&mut self, entry: PersonOrTeam) -> bool {
        if self.value.contains(&entry) {
            return false;
        }
        self.value.push(entry);
        true
    }

    /// Removes an entry; returns false if it was not assigned
    pub fn remove(&mut self, entry: &PersonOrTeam) -> bool {
        let before = self.value.len();
        self.value.retain(|e| e != entry);
        self.value.len() != before
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    fn decode_entry(&self, entry: &Value) -> Result<PersonOrTeam, ColumnValueError> {
        let malformed = |reason: &str| {
            self.meta
                .error(entry, ColumnValueErrorKind::Malformed(reason.to_string()))
        };
        let object = entry
            .as_object()
            .ok_or_else(|| malformed("expected {\"id\": ..., \"kind\": ...}"))?;

        let id = match object.get("id") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| malformed("expected an integer id"))?;

        let kind = match object.get("kind") {
            Some(Value::String(kind)) => kind
                .parse::<PeopleKind>()
                .map_err(|_| self.meta.error(entry, ColumnValueErrorKind::InvalidKind(kind.clone())))?,
            Some(other) => {
                return Err(self
                    .meta
                    .error(entry, ColumnValueErrorKind::InvalidKind(other.to_string())))
            }
            None => return Err(malformed("missing kind")),
        };

        Ok(PersonOrTeam { id, kind })
    }

    /// Decodes every entry, keeping first occurrences; nothing is returned
    /// unless all entries are valid
    fn decode_entries(&self, entries: &[Value]) -> Result<Vec<PersonOrTeam>, ColumnValueError> {
        let mut decoded: Vec<PersonOrTeam> = Vec::with_capacity(entries.len());
        for entry in entries {
            let entry = self.decode_entry(entry)?;
            if !decoded.contains(&entry) {
                decoded.push(entry);
            }
        }
        Ok(decoded)
    }

    fn decode_object(&self, json: &Value) -> Result<Vec<PersonOrTeam>, ColumnValueError> {
        match json.get(PERSONS_AND_TEAMS) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(entries)) => self.decode_entries(entries),
            Some(_) => Err(self.meta.error(
                json,
                ColumnValueErrorKind::Malformed(format!("'{}' must be a list", PERSONS_AND_TEAMS)),
            )),
        }
    }
}

impl ColumnVariant for PeopleValue {
    fn column_type(&self) -> ColumnType {
        ColumnType::People
    }

    fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ColumnMeta {
        &mut self.meta
    }

    fn load(&mut self, raw: &str) -> Result<(), ColumnValueError> {
        if is_blank_raw(raw) {
            self.value.clear();
            return Ok(());
        }
        let json = self.meta.parse_raw(raw)?;
        if !json.is_object() {
            return Err(self.meta.error(
                &json,
                ColumnValueErrorKind::Malformed(format!("expected {{\"{}\": [...]}}", PERSONS_AND_TEAMS)),
            ));
        }
        self.value = self.decode_object(&json)?;
        Ok(())
    }

    /// Accepts `null`, a list of entries, the wire object, or the wire object
    /// encoded as a JSON string
    fn set(&mut self, input: Value) -> Result<(), ColumnValueError> {
        self.value = match &input {
            Value::Null => Vec::new(),
            Value::Array(entries) => self.decode_entries(entries)?,
            Value::Object(_) => self.decode_object(&input)?,
            Value::String(raw) => {
                let json = self.meta.parse_raw(raw)?;
                if json.is_string() {
                    return Err(self.meta.error(
                        &input,
                        ColumnValueErrorKind::Invalid("expected people entries".into()),
                    ));
                }
                return self.set(json);
            }
            Value::Bool(_) | Value::Number(_) => {
                return Err(self.meta.error(
                    &input,
                    ColumnValueErrorKind::Invalid("expected people entries".into()),
                ))
            }
        };
        Ok(())
    }

    fn format(&self) -> Value {
        if self.value.is_empty() {
            json!({})
        } else {
            json!({ PERSONS_AND_TEAMS: self.value })
        }
    }

    fn native(&self) -> Value {
        json!(self.value)
    }

    fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
