//! The site's content catalog on top of `sitecontent-schema`.
//!
//! - [`catalog`]: the eight built-in collections and their shared shapes
//! - [`entries`]: typed mirrors of validated records
//! - [`references`]: advisory soft-reference and slug report
//! - [`source`]: content file discovery and front matter parsing
//! - [`tree`]: validate a whole content directory in one pass

pub mod catalog;
pub mod entries;
pub mod error;
pub mod references;
pub mod source;
pub mod tree;

pub use catalog::{registry, registry_with_config, Collection, Shapes};
pub use entries::{decode, ContentEntry};
pub use error::{ContentError, Result};
pub use references::{check_references, FindingKind, ReferenceFinding};
pub use source::{read_entries, RawEntry, SourcePattern};
pub use tree::{
    check_tree, load_collection, validate_entry, EntryOutcome, LoadedCollection, SourceFailure,
    TreeReport,
};
