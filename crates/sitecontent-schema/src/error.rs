use std::fmt;

use serde::Serialize;

/// Category of a single field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Issue {
    /// A required field is absent.
    Missing,
    /// The value has the wrong JSON type.
    TypeMismatch,
    /// A string value does not match the declared format (url, email, date).
    Format,
    /// A string value is shorter than the declared minimum length.
    TooShort,
    /// The key is not declared by the schema and undeclared keys are rejected.
    Unexpected,
}

/// One offending field of a rejected record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub collection: String,
    /// Dotted field path, `[i]` for array elements, `$` for the record itself.
    pub path: String,
    pub expected: String,
    pub actual: String,
    pub issue: Issue,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            Issue::Missing => write!(
                f,
                "{}.{}: required field missing (expected {})",
                self.collection, self.path, self.expected
            ),
            Issue::Unexpected => write!(
                f,
                "{}.{}: unexpected field ({})",
                self.collection, self.path, self.actual
            ),
            Issue::TypeMismatch | Issue::Format | Issue::TooShort => write!(
                f,
                "{}.{}: expected {}, found {}",
                self.collection, self.path, self.expected, self.actual
            ),
        }
    }
}

/// Non-empty, ordered list of field failures for one record.
///
/// Failures follow the validator's walk: declared fields in declaration
/// order, with a nested shape's failures (including its undeclared keys)
/// reported where its parent field sits, and an object's own undeclared
/// keys after all of its declared fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field paths in reporting order.
    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|err| err.path.as_str()).collect()
    }

    /// Find the failure reported for an exact field path.
    pub fn for_path(&self, path: &str) -> Option<&ValidationError> {
        self.0.iter().find(|err| err.path == path)
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Errors raised by the schema registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A collection with this name is already registered.
    #[error("collection already registered: {0}")]
    DuplicateCollection(String),

    /// No collection registered under the requested name.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// The record failed validation.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// A definition file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// A collection definition is structurally wrong.
    #[error("invalid collection definition: {0}")]
    InvalidDefinition(String),

    /// The exported JSON Schema could not be compiled.
    #[error("failed to compile schema: {0}")]
    CompileFailed(String),

    /// A definition is not valid JSON.
    #[error("definition is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl SchemaError {
    /// Field failures, when this is a validation rejection.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SchemaError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
