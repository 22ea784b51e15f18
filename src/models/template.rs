//! Template records and their server-assigned fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Fields the notes API assigns and maintains on its own.
///
/// An exported artifact carries them verbatim; an import must drop them so
/// the destination assigns fresh identity and usage metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerField {
    /// Server-assigned template identifier.
    TemplateId,
    /// Creation timestamp.
    CreatedAt,
    /// Last update timestamp.
    UpdatedAt,
    /// Number of times the template was applied to a note.
    UsageCount,
    /// Timestamp of the last application.
    LastUsedAt,
}

impl ServerField {
    /// Returns all server-assigned fields.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::TemplateId,
            Self::CreatedAt,
            Self::UpdatedAt,
            Self::UsageCount,
            Self::LastUsedAt,
        ]
    }

    /// Returns the JSON key used on the wire.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::TemplateId => "templateId",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::UsageCount => "usageCount",
            Self::LastUsedAt => "lastUsedAt",
        }
    }

    /// Parses a wire key.
    ///
    /// Returns `None` for portable (caller-defined) keys.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.wire_name() == key)
    }
}

impl fmt::Display for ServerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A note template as the notes API returns it.
///
/// The record is opaque: beyond the [`ServerField`]s, every key (`name`,
/// `content`, `tags`, ...) is carried as-is, in its original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(Map<String, Value>);

impl Template {
    /// Creates an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a field in place, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns whether the field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the server-assigned identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ServerField::TemplateId.wire_name())
    }

    /// Returns the template name when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the template has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the template, returning the underlying JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Template {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A template stripped of every [`ServerField`], ready to be created.
///
/// Only [`crate::io::TemplateNormalizer`] builds these, so a create call can
/// never be handed a record that still carries a foreign identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplatePayload(Map<String, Value>);

impl TemplatePayload {
    /// Wraps an already-normalized object.
    pub(crate) const fn from_normalized(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns whether the field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the template name when it is a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Borrows the underlying JSON object.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload, returning the underlying JSON object.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<TemplatePayload> for Template {
    fn from(payload: TemplatePayload) -> Self {
        Self(payload.0)
    }
}
