/// What the validator does with record keys that no field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Drop undeclared keys from the validated record.
    #[default]
    Strip,
    /// Report every undeclared key as a validation error.
    Reject,
}

/// Controls registry and validation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Handling of keys not declared by the collection schema.
    pub unknown_fields: UnknownFields,
    /// Maximum number of collection definitions loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per definition file loaded from a directory.
    pub max_schema_file_size: usize,
}

impl RegistryConfig {
    /// Default limits with undeclared keys rejected.
    pub fn strict() -> Self {
        Self {
            unknown_fields: UnknownFields::Reject,
            ..Self::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            unknown_fields: UnknownFields::Strip,
            max_schemas_from_directory: 256,
            max_schema_file_size: 256 * 1024,
        }
    }
}
