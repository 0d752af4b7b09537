//! Collection schema registry and record validator.
//!
//! Declare each content collection as an ordered list of [`FieldSpec`]s,
//! register it once at startup, then validate already-parsed records.
//! Validation collects every failing field instead of stopping at the first,
//! applies declared defaults, and checks nested objects recursively with
//! dotted field paths (`priceCard.ctaText`, `features[1].title`).
//!
//! This crate never reads content files. Parsing front matter or data files
//! is the caller's job.

pub mod config;
pub mod definition;
pub mod error;
pub mod field;
pub mod format;
pub mod json_schema;
pub mod record;
pub mod registry;
pub mod schema;
pub mod value;
mod validator;

pub use config::{RegistryConfig, UnknownFields};
pub use definition::CollectionDefinition;
pub use error::{Issue, Result, SchemaError, ValidationError, ValidationErrors};
pub use field::{FieldKind, FieldSpec, Shape};
pub use record::Record;
pub use registry::SchemaRegistry;
pub use schema::{CollectionSchema, SourceType};
pub use value::FieldValue;
