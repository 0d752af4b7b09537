use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::value::FieldValue;

/// A validated entry of a collection. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    collection: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(collection: impl Into<String>, fields: BTreeMap<String, FieldValue>) -> Self {
        Self {
            collection: collection.into(),
            fields,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn get_date(&self, field: &str) -> Option<&DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_date)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Raw form of the record, suitable for re-validation or typed decoding.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
