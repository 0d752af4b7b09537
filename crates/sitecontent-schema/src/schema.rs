use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::FieldSpec;

/// How a collection's entries are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Markdown documents, fields taken from front matter.
    #[default]
    Page,
    /// Structured data files (YAML or JSON).
    Data,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Page => "page",
            SourceType::Data => "data",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema of one named collection.
///
/// `source` is the location pattern entries are discovered from. The
/// validator never reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub name: String,
    pub source: String,
    pub source_type: SourceType,
    pub fields: Vec<FieldSpec>,
}

impl CollectionSchema {
    pub fn new(
        name: impl Into<String>,
        source_type: SourceType,
        source: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            source_type,
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.is_required())
    }
}
