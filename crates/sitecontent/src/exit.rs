use std::fmt;
use std::io;

use sitecontent_content::ContentError;
use sitecontent_schema::SchemaError;

// Process exit codes. USAGE matches sysexits EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: &io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::UnknownCollection(_) => CliError::new(USAGE, format!("{context}: {err}")),
        SchemaError::Invalid(_)
        | SchemaError::DuplicateCollection(_)
        | SchemaError::InvalidDefinition(_)
        | SchemaError::InvalidJson(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        SchemaError::LoadFailed(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        SchemaError::CompileFailed(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn content_error(context: &str, err: ContentError) -> CliError {
    match err {
        ContentError::Schema(err) => schema_error(context, err),
        ContentError::Read { ref source, .. } => {
            let mapped = io_error(context, source);
            CliError::new(mapped.code, format!("{context}: {err}"))
        }
        ContentError::Parse { .. } | ContentError::Decode(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ContentError::Pattern { .. } | ContentError::CollectionMismatch { .. } => {
            CliError::new(INTERNAL, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn unknown_collection_is_usage_error() {
        let err = schema_error("validate", SchemaError::UnknownCollection("posts".into()));
        assert_eq!(err.code, USAGE);
        assert_eq!(err.message, "validate: unknown collection: posts");
    }

    #[test]
    fn unreadable_content_maps_io_kind() {
        let err = content_error(
            "read",
            ContentError::Read {
                path: PathBuf::from("blog/a.md"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            },
        );
        assert_eq!(err.code, PERMISSION_DENIED);
        assert!(err.message.contains("blog/a.md"));
    }

    #[test]
    fn parse_failures_are_data_invalid() {
        let err = content_error(
            "read",
            ContentError::Parse {
                path: PathBuf::from("data/authors.yml"),
                message: "bad indent".into(),
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }
}
