use std::path::{Path, PathBuf};

use sitecontent_schema::SchemaError;

/// Errors raised while loading or decoding site content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The schema registry rejected the operation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A content file or directory could not be read.
    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A content file could not be parsed into raw records.
    #[error("failed parsing {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A collection source pattern is not a valid relative glob.
    #[error("invalid source pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    /// A record was decoded as an entry of another collection.
    #[error("record belongs to collection {found}, expected {expected}")]
    CollectionMismatch { expected: &'static str, found: String },

    /// A validated record does not fit the typed entry.
    #[error("record does not match typed entry: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ContentError {
    /// File or directory the error concerns, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ContentError::Read { path, .. } | ContentError::Parse { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
