//! Collection schemas declared as JSON documents.
//!
//! ```json
//! {
//!   "source": "events/**/*.md",
//!   "type": "page",
//!   "fields": [
//!     { "name": "title", "type": "string", "minLength": 1 },
//!     { "name": "startsAt", "type": "date" },
//!     { "name": "published", "type": "boolean", "default": false },
//!     { "name": "speakers", "type": "array", "optional": true,
//!       "items": { "type": "object", "shape": "Speaker",
//!                  "fields": [{ "name": "name", "type": "string" }] } }
//!   ]
//! }
//! ```

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::field::{FieldKind, FieldSpec, Shape};
use crate::schema::{CollectionSchema, SourceType};
use crate::validator::check_value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindName {
    String,
    Number,
    Boolean,
    Date,
    Url,
    Email,
    Array,
    Object,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectionDefinition {
    pub source: String,
    #[serde(rename = "type", default)]
    pub source_type: SourceType,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: KindDefinition,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub min_length: Option<usize>,
}

/// Kind of a field or of an array element.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindDefinition {
    #[serde(rename = "type")]
    pub kind: KindName,
    #[serde(default)]
    pub items: Option<Box<KindDefinition>>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    /// Label for object kinds, used in messages and exports.
    #[serde(default)]
    pub shape: Option<String>,
}

impl CollectionDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_schema(self, name: &str) -> Result<CollectionSchema> {
        let fields = self
            .fields
            .into_iter()
            .map(|field| field.into_spec(name))
            .collect::<Result<Vec<_>>>()?;
        check_unique_names(name, &fields)?;
        Ok(CollectionSchema::new(name, self.source_type, self.source, fields))
    }
}

impl FieldDefinition {
    fn into_spec(self, context: &str) -> Result<FieldSpec> {
        let path = format!("{context}.{}", self.name);
        let kind = self.kind.into_kind(&path)?;

        if self.min_length.is_some() && !kind.is_string_like() {
            return Err(SchemaError::InvalidDefinition(format!(
                "{path}: minLength only applies to string, url and email fields"
            )));
        }

        let mut spec = FieldSpec::new(self.name, kind);
        spec.optional = self.optional;
        spec.min_len = self.min_length;

        if let Some(raw) = self.default {
            let value = check_value(&spec, &raw).map_err(|errors| {
                SchemaError::InvalidDefinition(format!("{path}: default does not match: {errors}"))
            })?;
            spec.optional = true;
            spec.default = Some(value);
        }

        Ok(spec)
    }
}

impl KindDefinition {
    fn into_kind(self, path: &str) -> Result<FieldKind> {
        let kind = match self.kind {
            KindName::String => FieldKind::String,
            KindName::Number => FieldKind::Number,
            KindName::Boolean => FieldKind::Boolean,
            KindName::Date => FieldKind::Date,
            KindName::Url => FieldKind::Url,
            KindName::Email => FieldKind::Email,
            KindName::Array => {
                let items = self.items.ok_or_else(|| {
                    SchemaError::InvalidDefinition(format!("{path}: array field needs `items`"))
                })?;
                return Ok(FieldKind::Array(Box::new(items.into_kind(&format!("{path}[]"))?)));
            }
            KindName::Object => {
                if self.fields.is_empty() {
                    return Err(SchemaError::InvalidDefinition(format!(
                        "{path}: object field needs at least one entry in `fields`"
                    )));
                }
                let fields = self
                    .fields
                    .into_iter()
                    .map(|field| field.into_spec(path))
                    .collect::<Result<Vec<_>>>()?;
                check_unique_names(path, &fields)?;
                let name = self.shape.unwrap_or_else(|| path.to_string());
                return Ok(FieldKind::Object(Arc::new(Shape::new(name, fields))));
            }
        };

        if self.items.is_some() || !self.fields.is_empty() {
            return Err(SchemaError::InvalidDefinition(format!(
                "{path}: `items` and `fields` only apply to array and object fields"
            )));
        }
        Ok(kind)
    }
}

fn check_unique_names(context: &str, fields: &[FieldSpec]) -> Result<()> {
    for (idx, field) in fields.iter().enumerate() {
        if fields[..idx].iter().any(|earlier| earlier.name == field.name) {
            return Err(SchemaError::InvalidDefinition(format!(
                "{context}: field `{}` declared twice",
                field.name
            )));
        }
    }
    Ok(())
}
