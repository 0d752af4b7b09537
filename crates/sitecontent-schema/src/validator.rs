use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::UnknownFields;
use crate::error::{Issue, Result, SchemaError, ValidationError, ValidationErrors};
use crate::field::{FieldKind, FieldSpec};
use crate::format::{is_email, is_url, parse_date};
use crate::record::Record;
use crate::schema::CollectionSchema;
use crate::value::FieldValue;

const ROOT_PATH: &str = "$";
const PREVIEW_CHARS: usize = 40;

/// Validate one raw record, collecting every field failure.
pub(crate) fn validate_record(
    schema: &CollectionSchema,
    raw: &Value,
    unknown_fields: UnknownFields,
) -> Result<Record> {
    let mut walker = Walker {
        collection: &schema.name,
        unknown_fields,
        errors: Vec::new(),
    };

    let fields = match raw {
        Value::Object(map) => walker.object(&schema.fields, map, ""),
        other => {
            walker.push(ROOT_PATH, "object".to_string(), other, Issue::TypeMismatch);
            BTreeMap::new()
        }
    };

    if walker.errors.is_empty() {
        Ok(Record::new(schema.name.clone(), fields))
    } else {
        Err(SchemaError::Invalid(ValidationErrors::new(walker.errors)))
    }
}

/// Check a single value against a field declaration outside any record.
pub(crate) fn check_value(
    spec: &FieldSpec,
    raw: &Value,
) -> std::result::Result<FieldValue, ValidationErrors> {
    let mut walker = Walker {
        collection: "",
        unknown_fields: UnknownFields::Strip,
        errors: Vec::new(),
    };
    match walker.value(&spec.kind, spec.min_len, raw, &spec.name) {
        Some(value) if walker.errors.is_empty() => Ok(value),
        _ => Err(ValidationErrors::new(walker.errors)),
    }
}

struct Walker<'a> {
    collection: &'a str,
    unknown_fields: UnknownFields,
    errors: Vec<ValidationError>,
}

impl Walker<'_> {
    fn object(
        &mut self,
        specs: &[FieldSpec],
        map: &Map<String, Value>,
        prefix: &str,
    ) -> BTreeMap<String, FieldValue> {
        let mut out = BTreeMap::new();

        for spec in specs {
            let path = join_path(prefix, &spec.name);
            match map.get(&spec.name) {
                Some(raw) => {
                    if let Some(value) = self.value(&spec.kind, spec.min_len, raw, &path) {
                        out.insert(spec.name.clone(), value);
                    }
                }
                None => {
                    if let Some(default) = &spec.default {
                        out.insert(spec.name.clone(), default.clone());
                    } else if !spec.optional {
                        self.errors.push(ValidationError {
                            collection: self.collection.to_string(),
                            path,
                            expected: spec.kind.name(),
                            actual: "nothing".to_string(),
                            issue: Issue::Missing,
                        });
                    }
                }
            }
        }

        if self.unknown_fields == UnknownFields::Reject {
            for (key, raw) in map {
                if !specs.iter().any(|spec| spec.name == *key) {
                    self.push(
                        &join_path(prefix, key),
                        "no such field".to_string(),
                        raw,
                        Issue::Unexpected,
                    );
                }
            }
        }

        out
    }

    fn value(
        &mut self,
        kind: &FieldKind,
        min_len: Option<usize>,
        raw: &Value,
        path: &str,
    ) -> Option<FieldValue> {
        match kind {
            FieldKind::String | FieldKind::Url | FieldKind::Email => {
                let Value::String(text) = raw else {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    return None;
                };
                if let Some(min) = min_len {
                    if text.chars().count() < min {
                        self.push(path, min_len_label(min), raw, Issue::TooShort);
                        return None;
                    }
                }
                let well_formed = match kind {
                    FieldKind::Url => is_url(text),
                    FieldKind::Email => is_email(text),
                    _ => true,
                };
                if !well_formed {
                    self.push(path, kind.name(), raw, Issue::Format);
                    return None;
                }
                Some(FieldValue::String(text.clone()))
            }
            FieldKind::Number => match raw.as_f64() {
                Some(n) => Some(FieldValue::Number(n)),
                None => {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    None
                }
            },
            FieldKind::Boolean => match raw {
                Value::Bool(b) => Some(FieldValue::Bool(*b)),
                _ => {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    None
                }
            },
            FieldKind::Date => match raw {
                Value::String(text) => match parse_date(text) {
                    Some(date) => Some(FieldValue::Date(date)),
                    None => {
                        self.push(path, kind.name(), raw, Issue::Format);
                        None
                    }
                },
                _ => {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    None
                }
            },
            FieldKind::Array(item) => {
                let Value::Array(items) = raw else {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    return None;
                };
                let mut out = Vec::with_capacity(items.len());
                let mut all_valid = true;
                for (idx, element) in items.iter().enumerate() {
                    match self.value(item, None, element, &format!("{path}[{idx}]")) {
                        Some(value) => out.push(value),
                        None => all_valid = false,
                    }
                }
                all_valid.then_some(FieldValue::List(out))
            }
            FieldKind::Object(shape) => {
                let Value::Object(map) = raw else {
                    self.push(path, kind.name(), raw, Issue::TypeMismatch);
                    return None;
                };
                let before = self.errors.len();
                let fields = self.object(&shape.fields, map, path);
                (self.errors.len() == before).then_some(FieldValue::Object(fields))
            }
        }
    }

    fn push(&mut self, path: &str, expected: String, raw: &Value, issue: Issue) {
        self.errors.push(ValidationError {
            collection: self.collection.to_string(),
            path: path.to_string(),
            expected,
            actual: describe(raw),
            issue,
        });
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn min_len_label(min: usize) -> String {
    if min == 1 {
        "non-empty string".to_string()
    } else {
        format!("string of at least {min} characters")
    }
}

/// Short human description of a raw value for error reports.
pub(crate) fn describe(raw: &Value) -> String {
    match raw {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => {
            let mut preview: String = s.chars().take(PREVIEW_CHARS).collect();
            if s.chars().count() > PREVIEW_CHARS {
                preview.push_str("...");
            }
            format!("string {preview:?}")
        }
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(map) => format!("object with {} keys", map.len()),
    }
}
