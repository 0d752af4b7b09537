use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::config::RegistryConfig;
use crate::definition::CollectionDefinition;
use crate::error::{Result, SchemaError};
use crate::json_schema::{compile, to_json_schema};
use crate::record::Record;
use crate::schema::CollectionSchema;
use crate::validator::validate_record;

const DEFINITION_SUFFIX: &str = ".collection.json";

/// Name-keyed registry of collection schemas.
///
/// Populated at startup, then only read. Shared references are safe across
/// threads without locking.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, CollectionSchema>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            schemas: BTreeMap::new(),
            config,
        }
    }

    /// Register a collection under its schema name.
    pub fn register(&mut self, schema: CollectionSchema) -> Result<()> {
        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::DuplicateCollection(schema.name));
        }
        tracing::debug!(
            collection = %schema.name,
            fields = schema.fields.len(),
            source = %schema.source,
            "registered collection"
        );
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Register a collection from a JSON definition document.
    pub fn register_definition(&mut self, name: &str, definition_json: &str) -> Result<()> {
        let schema = CollectionDefinition::from_json(definition_json)?.into_schema(name)?;
        self.register(schema)
    }

    /// Load `<name>.collection.json` definitions from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load definitions from a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        registry.load_directory(path)?;
        Ok(registry)
    }

    /// Add every definition found in a directory to this registry.
    ///
    /// Returns the names loaded, sorted.
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<String>> {
        let mut loaded = Vec::new();

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        let mut pending = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(DEFINITION_SUFFIX) {
                continue;
            }
            let Some(name) = collection_name_from_file_name(&file_name) else {
                return Err(SchemaError::LoadFailed(format!(
                    "unrecognized definition filename: {file_name}"
                )));
            };
            pending.push((name, file_name, entry.path()));
        }
        pending.sort();

        for (name, file_name, entry_path) in pending {
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load definition symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }

            if loaded.len() >= self.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "definition count exceeds configured max ({}): {}",
                    self.config.max_schemas_from_directory,
                    loaded.len() + 1
                )));
            }

            let file = std::fs::File::open(&entry_path).map_err(|err| {
                SchemaError::LoadFailed(format!(
                    "failed opening definition {}: {err}",
                    entry_path.display()
                ))
            })?;
            let opened_metadata = file
                .metadata()
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

            #[cfg(unix)]
            {
                if !same_file_identity(&path_metadata, &opened_metadata) {
                    return Err(SchemaError::LoadFailed(format!(
                        "definition file changed during load: {file_name}"
                    )));
                }
            }

            if opened_metadata.len() > self.config.max_schema_file_size as u64 {
                return Err(SchemaError::LoadFailed(format!(
                    "definition file too large ({} bytes): {file_name}",
                    opened_metadata.len()
                )));
            }

            let max_bytes = self.config.max_schema_file_size;
            let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
            let mut content = String::new();
            file.take(read_limit)
                .read_to_string(&mut content)
                .map_err(|err| {
                    SchemaError::LoadFailed(format!(
                        "failed reading definition {}: {err}",
                        entry_path.display()
                    ))
                })?;
            if content.len() > max_bytes {
                return Err(SchemaError::LoadFailed(format!(
                    "definition file too large while reading: {file_name}"
                )));
            }

            self.register_definition(&name, &content)?;
            loaded.push(name);
        }

        tracing::debug!(
            dir = %path.display(),
            count = loaded.len(),
            "loaded collection definitions"
        );
        Ok(loaded)
    }

    /// Validate a raw record against the named collection.
    ///
    /// `SchemaError::Invalid` carries every offending field.
    pub fn validate(&self, collection: &str, raw: &Value) -> Result<Record> {
        let schema = self.schema(collection)?;
        let result = validate_record(schema, raw, self.config.unknown_fields);
        match &result {
            Ok(_) => tracing::debug!(collection, "record valid"),
            Err(err) => tracing::debug!(
                collection,
                failures = err.validation_errors().map_or(0, |errors| errors.len()),
                "record rejected"
            ),
        }
        result
    }

    /// Validate independent records; each succeeds or fails on its own.
    ///
    /// Only an unknown collection fails the whole batch.
    pub fn validate_many(&self, collection: &str, raws: &[Value]) -> Result<Vec<Result<Record>>> {
        let schema = self.schema(collection)?;
        Ok(raws
            .iter()
            .map(|raw| validate_record(schema, raw, self.config.unknown_fields))
            .collect())
    }

    /// JSON Schema export of a collection, checked to compile.
    pub fn json_schema(&self, collection: &str) -> Result<Value> {
        let document = to_json_schema(self.schema(collection)?, self.config.unknown_fields);
        compile(&document)?;
        Ok(document)
    }

    /// Look up a collection schema.
    pub fn get(&self, collection: &str) -> Option<&CollectionSchema> {
        self.schemas.get(collection)
    }

    /// Check if a collection is registered.
    pub fn contains(&self, collection: &str) -> bool {
        self.schemas.contains_key(collection)
    }

    /// Registered collection names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Registered schemas in name order.
    pub fn schemas(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn schema(&self, collection: &str) -> Result<&CollectionSchema> {
        self.schemas
            .get(collection)
            .ok_or_else(|| SchemaError::UnknownCollection(collection.to_string()))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn collection_name_from_file_name(file_name: &str) -> Option<String> {
    let name = file_name.strip_suffix(DEFINITION_SUFFIX)?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| name.to_string())
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::config::UnknownFields;
    use crate::field::FieldSpec;
    use crate::schema::SourceType;

    const NOTES: &str = r#"{
        "source": "notes/*.md",
        "type": "page",
        "fields": [
            { "name": "title", "type": "string" },
            { "name": "pinned", "type": "boolean", "default": false }
        ]
    }"#;

    fn categories() -> CollectionSchema {
        CollectionSchema::new(
            "categories",
            SourceType::Data,
            "data/categories.yml",
            vec![
                FieldSpec::string("title"),
                FieldSpec::string("icon"),
                FieldSpec::string("slug"),
            ],
        )
    }

    fn write_definition(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn register_and_validate() {
        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();

        let record = registry
            .validate("categories", &json!({"title": "Web", "icon": "i-web", "slug": "web"}))
            .unwrap();
        assert_eq!(record.collection(), "categories");
        assert_eq!(record.get_str("slug"), Some("web"));

        assert!(matches!(
            registry.validate("categories", &json!({"title": 1})),
            Err(SchemaError::Invalid(_))
        ));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();
        assert!(matches!(
            registry.register(categories()),
            Err(SchemaError::DuplicateCollection(name)) if name == "categories"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_collection_fails() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.validate("nonexistent", &json!({})),
            Err(SchemaError::UnknownCollection(name)) if name == "nonexistent"
        ));
        assert!(matches!(
            registry.validate_many("nonexistent", &[]),
            Err(SchemaError::UnknownCollection(_))
        ));
        assert!(matches!(
            registry.json_schema("nonexistent"),
            Err(SchemaError::UnknownCollection(_))
        ));
    }

    #[test]
    fn validate_many_keeps_records_independent() {
        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();

        let results = registry
            .validate_many(
                "categories",
                &[
                    json!({"title": "Web", "icon": "i", "slug": "web"}),
                    json!({"title": "Broken"}),
                    json!({"title": "Ops", "icon": "i", "slug": "ops"}),
                ],
            )
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn strict_config_rejects_unknown_fields() {
        let mut registry = SchemaRegistry::with_config(RegistryConfig::strict());
        registry.register(categories()).unwrap();

        let raw = json!({"title": "Web", "icon": "i", "slug": "web", "color": "blue"});
        let err = registry.validate("categories", &raw).unwrap_err();
        assert_eq!(
            err.validation_errors().map(|errors| errors.paths()),
            Some(vec!["color"])
        );
        assert_eq!(registry.config().unknown_fields, UnknownFields::Reject);
    }

    #[test]
    fn register_definition_parses_json() {
        let mut registry = SchemaRegistry::new();
        registry.register_definition("notes", NOTES).unwrap();

        let record = registry.validate("notes", &json!({"title": "Hi"})).unwrap();
        assert_eq!(record.get_bool("pinned"), Some(false));

        assert!(matches!(
            registry.register_definition("broken", "not-json"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn names_are_sorted() {
        let mut registry = SchemaRegistry::new();
        registry.register_definition("notes", NOTES).unwrap();
        registry.register(categories()).unwrap();
        assert_eq!(registry.names(), vec!["categories", "notes"]);
        assert!(registry.contains("notes"));
        assert!(!registry.is_empty());
    }

    #[test]
    fn json_schema_export_compiles() {
        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();
        let doc = registry.json_schema("categories").unwrap();
        assert_eq!(doc["required"], json!(["title", "icon", "slug"]));
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }

    #[test]
    fn from_directory_loads_definitions() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "notes.collection.json", NOTES);
        write_definition(dir.path(), "README.md", "ignored");
        write_definition(dir.path(), "notes.json", NOTES);

        let registry = SchemaRegistry::from_directory(dir.path()).unwrap();
        assert_eq!(registry.names(), vec!["notes"]);
        assert!(registry.validate("notes", &json!({"title": "x"})).is_ok());
    }

    #[test]
    fn load_directory_extends_existing_registry() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "notes.collection.json", NOTES);

        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();
        let loaded = registry.load_directory(dir.path()).unwrap();

        assert_eq!(loaded, vec!["notes".to_string()]);
        assert_eq!(registry.names(), vec!["categories", "notes"]);
    }

    #[test]
    fn directory_definition_colliding_with_registered_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "categories.collection.json", NOTES);

        let mut registry = SchemaRegistry::new();
        registry.register(categories()).unwrap();
        assert!(matches!(
            registry.load_directory(dir.path()),
            Err(SchemaError::DuplicateCollection(_))
        ));
    }

    #[test]
    fn missing_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = SchemaRegistry::from_directory(&dir.path().join("absent"));
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_definition_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let target = write_definition(dir.path(), "target.json", NOTES);
        std::os::unix::fs::symlink(&target, dir.path().join("notes.collection.json")).unwrap();

        let result = SchemaRegistry::from_directory(dir.path());
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }

    #[test]
    fn definition_count_limit_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "a.collection.json", NOTES);
        write_definition(dir.path(), "b.collection.json", NOTES);

        let config = RegistryConfig {
            max_schemas_from_directory: 1,
            ..RegistryConfig::default()
        };
        let result = SchemaRegistry::from_directory_with_config(dir.path(), config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }

    #[test]
    fn definition_file_size_limit_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "notes.collection.json", NOTES);

        let config = RegistryConfig {
            max_schema_file_size: 8,
            ..RegistryConfig::default()
        };
        let result = SchemaRegistry::from_directory_with_config(dir.path(), config);
        assert!(matches!(result, Err(SchemaError::LoadFailed(_))));
    }

    #[test]
    fn invalid_definition_filename_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        write_definition(dir.path(), "notes.collection.json", NOTES);
        write_definition(dir.path(), "bad name.collection.json", NOTES);

        match SchemaRegistry::from_directory(dir.path()) {
            Err(SchemaError::LoadFailed(message)) => {
                assert!(message.contains("unrecognized definition filename"));
                assert!(message.contains("bad name.collection.json"));
            }
            other => panic!("expected load failure, got {other:?}"),
        }
    }

    #[test]
    fn file_names_map_to_collection_names() {
        assert_eq!(
            collection_name_from_file_name("case-studies.collection.json"),
            Some("case-studies".to_string())
        );
        assert_eq!(collection_name_from_file_name(".collection.json"), None);
        assert_eq!(collection_name_from_file_name("bad name.collection.json"), None);
        assert_eq!(collection_name_from_file_name("notes.schema.json"), None);
    }

    #[cfg(unix)]
    #[test]
    fn same_file_identity_distinguishes_replaced_file() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_definition(dir.path(), "first.json", NOTES);
        let second = write_definition(dir.path(), "second.json", NOTES);

        let first_meta = std::fs::symlink_metadata(&first).unwrap();
        let opened_first_meta = std::fs::File::open(&first).unwrap().metadata().unwrap();
        let opened_second_meta = std::fs::File::open(&second).unwrap().metadata().unwrap();

        assert!(same_file_identity(&first_meta, &opened_first_meta));
        assert!(!same_file_identity(&first_meta, &opened_second_meta));
    }
}
