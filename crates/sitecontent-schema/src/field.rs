use std::fmt;
use std::sync::Arc;

use crate::value::FieldValue;

/// Kind of value a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// Calendar date (`YYYY-MM-DD`) or RFC 3339 timestamp.
    Date,
    /// Absolute URL.
    Url,
    Email,
    Array(Box<FieldKind>),
    Object(Arc<Shape>),
}

impl FieldKind {
    /// Short name used in validation messages.
    pub fn name(&self) -> String {
        match self {
            FieldKind::String => "string".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Date => "date".to_string(),
            FieldKind::Url => "url".to_string(),
            FieldKind::Email => "email".to_string(),
            FieldKind::Array(item) => format!("array<{}>", item.name()),
            FieldKind::Object(shape) => format!("object {}", shape.name),
        }
    }

    pub fn is_string_like(&self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Url | FieldKind::Email)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A named group of fields shared between collections by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl Shape {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Build a shape ready to be referenced from several fields.
    pub fn shared(name: impl Into<String>, fields: Vec<FieldSpec>) -> Arc<Self> {
        Arc::new(Self::new(name, fields))
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub optional: bool,
    /// Applied when the field is absent. Always implies `optional`.
    pub default: Option<FieldValue>,
    /// Minimum character count for string-like kinds.
    pub min_len: Option<usize>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            default: None,
            min_len: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Url)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Email)
    }

    pub fn array(name: impl Into<String>, item: FieldKind) -> Self {
        Self::new(name, FieldKind::Array(Box::new(item)))
    }

    pub fn object(name: impl Into<String>, shape: &Arc<Shape>) -> Self {
        Self::new(name, FieldKind::Object(Arc::clone(shape)))
    }

    pub fn array_of(name: impl Into<String>, shape: &Arc<Shape>) -> Self {
        Self::array(name, FieldKind::Object(Arc::clone(shape)))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// A field that must be present in the raw record.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }
}
