use std::path::Path;

use serde::Serialize;
use sitecontent_schema::{Record, SchemaError, SchemaRegistry, ValidationErrors};

use crate::error::{ContentError, Result};
use crate::references::{check_references, ReferenceFinding};
use crate::source::{read_entries, RawEntry, SourcePattern};

/// Validation result for one raw entry.
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub collection: String,
    pub entry: String,
    pub result: std::result::Result<Record, ValidationErrors>,
}

/// A content file that could not be read or parsed into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub collection: String,
    pub entry: String,
    pub message: String,
}

impl SourceFailure {
    fn new(collection: &str, fallback: &Path, err: &ContentError) -> Self {
        Self {
            collection: collection.to_string(),
            entry: err.path().unwrap_or(fallback).display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Raw entries of one collection, plus the files that yielded none.
#[derive(Debug, Clone, Default)]
pub struct LoadedCollection {
    pub entries: Vec<RawEntry>,
    pub failures: Vec<SourceFailure>,
}

/// Results of checking a whole content tree.
#[derive(Debug, Clone, Default)]
pub struct TreeReport {
    pub entries: Vec<EntryOutcome>,
    pub failures: Vec<SourceFailure>,
    pub findings: Vec<ReferenceFinding>,
}

impl TreeReport {
    pub fn valid_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    /// Entries that failed validation plus files that could not be read.
    pub fn invalid_count(&self) -> usize {
        self.entries.len() - self.valid_count() + self.failures.len()
    }
}

/// Raw entries of one registered collection found under `root`.
///
/// Unreadable or unparsable files become [`SourceFailure`]s; the remaining
/// files still load.
pub fn load_collection(
    root: &Path,
    registry: &SchemaRegistry,
    collection: &str,
) -> Result<LoadedCollection> {
    let schema = registry
        .get(collection)
        .ok_or_else(|| SchemaError::UnknownCollection(collection.to_string()))?;
    let pattern = SourcePattern::parse(&schema.source)?;

    let (paths, walk_errors) = pattern.discover(root);
    let mut loaded = LoadedCollection {
        failures: walk_errors
            .iter()
            .map(|err| SourceFailure::new(collection, root, err))
            .collect(),
        ..LoadedCollection::default()
    };
    for path in paths {
        match read_entries(&path) {
            Ok(entries) => loaded.entries.extend(entries),
            Err(err) => loaded
                .failures
                .push(SourceFailure::new(collection, &path, &err)),
        }
    }

    tracing::debug!(
        collection,
        count = loaded.entries.len(),
        failures = loaded.failures.len(),
        "loaded raw entries"
    );
    Ok(loaded)
}

/// Validate an entry, keeping validation failures as data.
pub fn validate_entry(
    registry: &SchemaRegistry,
    collection: &str,
    entry: &RawEntry,
) -> Result<EntryOutcome> {
    let result = match registry.validate(collection, &entry.value) {
        Ok(record) => Ok(record),
        Err(SchemaError::Invalid(errors)) => Err(errors),
        Err(other) => return Err(ContentError::Schema(other)),
    };
    Ok(EntryOutcome {
        collection: collection.to_string(),
        entry: entry.label(),
        result,
    })
}

/// Discover, validate and cross-check every registered collection.
///
/// Fails only when `root` is not a directory; per-file problems land in the
/// report.
pub fn check_tree(root: &Path, registry: &SchemaRegistry) -> Result<TreeReport> {
    if !root.is_dir() {
        return Err(ContentError::Read {
            path: root.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "content root is not a directory",
            ),
        });
    }

    let mut report = TreeReport::default();
    for collection in registry.names() {
        let loaded = load_collection(root, registry, collection)?;
        for failure in &loaded.failures {
            tracing::warn!(
                entry = %failure.entry,
                error = %failure.message,
                "unreadable content file"
            );
        }
        report.failures.extend(loaded.failures);

        for entry in &loaded.entries {
            let outcome = validate_entry(registry, collection, entry)?;
            if let Err(errors) = &outcome.result {
                tracing::warn!(
                    entry = %outcome.entry,
                    failures = errors.len(),
                    "invalid content entry"
                );
            }
            report.entries.push(outcome);
        }
    }

    let records: Vec<Record> = report
        .entries
        .iter()
        .filter_map(|outcome| outcome.result.as_ref().ok().cloned())
        .collect();
    report.findings = check_references(&records);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::catalog::registry;
    use crate::references::FindingKind;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn checks_every_collection_in_tree() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "blog/hello.md",
            "---\ntitle: Hello\ndescription: D\nslug: hello\nimage: /i.png\n\
             publishedAt: 2024-01-15\nauthor: Ada\ntags: [intro]\ncategory: web\n---\nBody\n",
        );
        write(root.path(), "blog/broken.md", "---\ntitle: Broken\n---\n");
        write(
            root.path(),
            "data/authors.yml",
            "- name: Grace\n  position: Editor\n  avatar: /g.png\n  bio: B\n",
        );
        write(
            root.path(),
            "data/categories.yml",
            "- title: Web\n  icon: i-web\n  slug: web\n",
        );

        let report = check_tree(root.path(), &registry().unwrap()).unwrap();
        assert_eq!(report.entries.len(), 4);
        assert_eq!(report.valid_count(), 3);
        assert_eq!(report.invalid_count(), 1);

        let broken = report
            .entries
            .iter()
            .find(|e| e.entry.ends_with("broken.md"))
            .unwrap();
        let errors = broken.result.as_ref().unwrap_err();
        assert_eq!(
            errors.paths(),
            vec!["description", "slug", "image", "publishedAt", "author", "tags"]
        );

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::UnknownAuthor);
        assert_eq!(report.findings[0].value, "Ada");
    }

    #[test]
    fn unknown_collection_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_collection(root.path(), &registry().unwrap(), "posts"),
            Err(ContentError::Schema(SchemaError::UnknownCollection(_)))
        ));
    }

    #[test]
    fn empty_tree_is_clean() {
        let root = tempfile::tempdir().unwrap();
        let report = check_tree(root.path(), &registry().unwrap()).unwrap();
        assert!(report.entries.is_empty());
        assert!(report.failures.is_empty());
        assert!(report.findings.is_empty());
    }

    #[test]
    fn malformed_file_is_reported_beside_good_entries() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "blog/good.md",
            "---\ntitle: Good\ndescription: D\nslug: good\nimage: /i.png\n\
             publishedAt: 2024-01-15\nauthor: Grace\ntags: [intro]\n---\nBody\n",
        );
        write(root.path(), "blog/bad.md", "---\ntitle: [unclosed\n---\nBody\n");
        write(
            root.path(),
            "data/authors.yml",
            "- name: Grace\n  position: Editor\n  avatar: /g.png\n  bio: B\n",
        );

        let report = check_tree(root.path(), &registry().unwrap()).unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.valid_count(), 2);
        assert!(report.entries.iter().any(|e| e.entry.ends_with("good.md")));

        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.collection, "blog");
        assert!(failure.entry.ends_with("bad.md"));
        assert!(failure.message.contains("failed parsing"));
        assert_eq!(report.invalid_count(), 1);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn load_collection_keeps_readable_files() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "data/categories.yml", "- title: [oops\n");
        write(root.path(), "data/authors.yml", "- name: Ada\n");

        let registry = registry().unwrap();
        let categories = load_collection(root.path(), &registry, "categories").unwrap();
        assert!(categories.entries.is_empty());
        assert_eq!(categories.failures.len(), 1);

        let authors = load_collection(root.path(), &registry, "authors").unwrap();
        assert_eq!(authors.entries.len(), 1);
        assert!(authors.failures.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            check_tree(&root.path().join("nope"), &registry().unwrap()),
            Err(ContentError::Read { .. })
        ));
    }
}
