use serde_json::{json, Map, Value};

use crate::config::UnknownFields;
use crate::error::{Result, SchemaError};
use crate::field::{FieldKind, FieldSpec};
use crate::schema::CollectionSchema;

const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Render a collection as a JSON Schema 2020-12 document for editors.
///
/// With `UnknownFields::Reject` every object gets `additionalProperties: false`.
pub fn to_json_schema(schema: &CollectionSchema, unknown_fields: UnknownFields) -> Value {
    let mut root = object_schema(&schema.fields, unknown_fields);
    root.insert("$schema".to_string(), Value::String(DIALECT.to_string()));
    root.insert("title".to_string(), Value::String(schema.name.clone()));
    root.insert(
        "description".to_string(),
        Value::String(format!("{} collection ({})", schema.source_type, schema.source)),
    );
    Value::Object(root)
}

/// Compile an exported document to make sure it is a usable schema.
pub fn compile(document: &Value) -> Result<jsonschema::Validator> {
    jsonschema::validator_for(document).map_err(|err| SchemaError::CompileFailed(err.to_string()))
}

fn object_schema(fields: &[FieldSpec], unknown_fields: UnknownFields) -> Map<String, Value> {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in fields {
        let mut property = kind_schema(&field.kind, unknown_fields);
        if let Some(min) = field.min_len {
            property.insert("minLength".to_string(), json!(min));
        }
        if let Some(default) = &field.default {
            property.insert("default".to_string(), default.to_json());
        }
        properties.insert(field.name.clone(), Value::Object(property));
        if field.is_required() {
            required.push(Value::String(field.name.clone()));
        }
    }

    let mut out = Map::new();
    out.insert("type".to_string(), Value::String("object".to_string()));
    out.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        out.insert("required".to_string(), Value::Array(required));
    }
    if unknown_fields == UnknownFields::Reject {
        out.insert("additionalProperties".to_string(), Value::Bool(false));
    }
    out
}

fn kind_schema(kind: &FieldKind, unknown_fields: UnknownFields) -> Map<String, Value> {
    let value = match kind {
        FieldKind::String => json!({ "type": "string" }),
        FieldKind::Number => json!({ "type": "number" }),
        FieldKind::Boolean => json!({ "type": "boolean" }),
        FieldKind::Date => json!({
            "type": "string",
            "anyOf": [{ "format": "date" }, { "format": "date-time" }]
        }),
        FieldKind::Url => json!({ "type": "string", "format": "uri" }),
        FieldKind::Email => json!({ "type": "string", "format": "email" }),
        FieldKind::Array(item) => {
            let items = Value::Object(kind_schema(item, unknown_fields));
            json!({ "type": "array", "items": items })
        }
        FieldKind::Object(shape) => {
            let mut nested = object_schema(&shape.fields, unknown_fields);
            nested.insert("title".to_string(), Value::String(shape.name.clone()));
            Value::Object(nested)
        }
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
