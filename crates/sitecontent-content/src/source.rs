//! Content file discovery and parsing into raw records.
//!
//! A source is either a fixed path (`data/authors.yml`) or a glob relative
//! to the content root (`landing/*.md`, `blog/**/*.md`). `*` never crosses
//! a `/` and `**` spans zero or more directories.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::error::{ContentError, Result};

/// Deepest directory level searched below a pattern's base directory.
pub const MAX_DEPTH: usize = 32;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Parsed collection source pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePattern {
    raw: String,
    base: PathBuf,
    glob: Option<Pattern>,
}

impl SourcePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| ContentError::Pattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.starts_with('/') {
            return Err(invalid("absolute patterns are not allowed".to_string()));
        }
        let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(invalid("empty pattern".to_string()));
        }
        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(invalid("relative segments are not allowed".to_string()));
        }

        let raw = segments.join("/");
        let fixed = segments.iter().take_while(|s| !has_wildcard(s)).count();
        let base = segments[..fixed].iter().collect();
        if fixed == segments.len() {
            return Ok(Self {
                raw,
                base,
                glob: None,
            });
        }

        let glob = Pattern::new(&raw).map_err(|err| invalid(err.to_string()))?;
        Ok(Self {
            raw,
            base,
            glob: Some(glob),
        })
    }

    /// Normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Directory below the content root where matching starts, or the file
    /// itself for a fixed path.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn is_fixed(&self) -> bool {
        self.glob.is_none()
    }

    /// Whether a root-relative, `/`-separated path matches.
    pub fn matches(&self, relative: &str) -> bool {
        match &self.glob {
            Some(glob) => glob.matches_with(relative, MATCH_OPTIONS),
            None => relative == self.raw,
        }
    }

    /// Matching files under `root`, sorted, with any walk errors alongside.
    ///
    /// A missing base directory matches nothing. Symlinks are never
    /// followed.
    pub fn discover(&self, root: &Path) -> (Vec<PathBuf>, Vec<ContentError>) {
        let start = root.join(&self.base);
        let mut files = Vec::new();
        let mut errors = Vec::new();

        if self.glob.is_none() {
            match std::fs::symlink_metadata(&start) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    tracing::warn!(path = %start.display(), "skipping symlinked content entry");
                }
                Ok(meta) if meta.is_file() => files.push(start),
                _ => {}
            }
            return (files, errors);
        }
        if !start.is_dir() {
            return (files, errors);
        }

        let walker = WalkDir::new(&start)
            .follow_links(false)
            .max_depth(MAX_DEPTH)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map_or_else(|| start.clone(), Path::to_path_buf);
                    errors.push(ContentError::Read {
                        path,
                        source: err.into(),
                    });
                    continue;
                }
            };

            if entry.path_is_symlink() {
                tracing::warn!(path = %entry.path().display(), "skipping symlinked content entry");
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if self.matches(&slash_path(relative)) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        (files, errors)
    }
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// One raw record read from a content file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub path: PathBuf,
    /// Position within a data file holding a list of records.
    pub index: Option<usize>,
    pub value: Value,
}

impl RawEntry {
    /// `path` or `path[index]`, for reports.
    pub fn label(&self) -> String {
        match self.index {
            Some(idx) => format!("{}[{idx}]", self.path.display()),
            None => self.path.display().to_string(),
        }
    }
}

/// Read a content file into raw records.
///
/// Markdown yields its front matter (an empty object when there is none).
/// YAML and JSON files yield one record, or one per element of a top-level
/// list.
pub fn read_entries(path: &Path) -> Result<Vec<RawEntry>> {
    let text = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let parse_error = |message: String| ContentError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match extension.as_str() {
        "md" | "markdown" => {
            let value = match front_matter(&text).map_err(parse_error)? {
                Some(yaml) => parse_yaml(yaml).map_err(parse_error)?,
                None => Value::Object(Map::new()),
            };
            Ok(vec![RawEntry {
                path: path.to_path_buf(),
                index: None,
                value,
            }])
        }
        "yml" | "yaml" => Ok(split_list(path, parse_yaml(&text).map_err(parse_error)?)),
        "json" => {
            let value = serde_json::from_str(&text).map_err(|err| parse_error(err.to_string()))?;
            Ok(split_list(path, value))
        }
        other => Err(parse_error(format!("unsupported file extension {other:?}"))),
    }
}

fn split_list(path: &Path, value: Value) -> Vec<RawEntry> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, value)| RawEntry {
                path: path.to_path_buf(),
                index: Some(idx),
                value,
            })
            .collect(),
        value => vec![RawEntry {
            path: path.to_path_buf(),
            index: None,
            value,
        }],
    }
}

fn parse_yaml(text: &str) -> std::result::Result<Value, String> {
    let value: Value = serde_yaml::from_str(text).map_err(|err| err.to_string())?;
    Ok(match value {
        Value::Null => Value::Object(Map::new()),
        other => other,
    })
}

/// YAML between a leading `---` line and the next `---` line.
fn front_matter(text: &str) -> std::result::Result<Option<&str>, String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(rest) = text.strip_prefix("---") else {
        return Ok(None);
    };
    let Some(rest) = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Ok(Some(&rest[..offset]));
        }
        offset += line.len();
    }
    Err("front matter is not closed by a `---` line".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_catalog_patterns() {
        let authors = SourcePattern::parse("data/authors.yml").unwrap();
        assert!(authors.is_fixed());
        assert_eq!(authors.base(), Path::new("data/authors.yml"));

        let blog = SourcePattern::parse("blog/**/*.md").unwrap();
        assert!(!blog.is_fixed());
        assert_eq!(blog.base(), Path::new("blog"));
        assert!(blog.matches("blog/a.md"));
        assert!(blog.matches("blog/2024/01/a.md"));
        assert!(!blog.matches("blog/a.txt"));

        let landing = SourcePattern::parse("landing/*.md").unwrap();
        assert!(landing.matches("landing/home.md"));
        assert!(!landing.matches("landing/nested/skip.md"));
        assert!(!landing.matches("landing/.hidden.md"));

        let drafts = SourcePattern::parse("posts/*-draft.m?").unwrap();
        assert!(drafts.matches("posts/hello-draft.md"));
        assert!(!drafts.matches("posts/hello.md"));

        let anywhere = SourcePattern::parse("*/index.md").unwrap();
        assert_eq!(anywhere.base(), Path::new(""));
        assert_eq!(anywhere.as_str(), "*/index.md");
    }

    #[test]
    fn rejects_invalid_patterns() {
        for pattern in ["", "/", "/abs/*.md", "../secrets/*.yml", "blog/./*.md"] {
            assert!(
                matches!(SourcePattern::parse(pattern), Err(ContentError::Pattern { .. })),
                "{pattern:?} should be rejected"
            );
        }
        assert!(SourcePattern::parse("blog/[*.md").is_err());
        assert!(SourcePattern::parse("blog/a**.md").is_err());
    }

    #[test]
    fn discovers_recursive_and_flat_sources() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "blog/2024/b.md", "");
        write(root.path(), "blog/a.md", "");
        write(root.path(), "blog/notes.txt", "");
        write(root.path(), "landing/home.md", "");
        write(root.path(), "landing/nested/skip.md", "");

        let (blog, errors) = SourcePattern::parse("blog/**/*.md")
            .unwrap()
            .discover(root.path());
        assert!(errors.is_empty());
        assert_eq!(
            blog,
            vec![
                root.path().join("blog/2024/b.md"),
                root.path().join("blog/a.md")
            ]
        );

        let (landing, _) = SourcePattern::parse("landing/*.md")
            .unwrap()
            .discover(root.path());
        assert_eq!(landing, vec![root.path().join("landing/home.md")]);

        let (missing, errors) = SourcePattern::parse("projects/**/*.md")
            .unwrap()
            .discover(root.path());
        assert!(missing.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn discovers_fixed_paths() {
        let root = tempfile::tempdir().unwrap();
        write(root.path(), "data/authors.yml", "[]");

        let (found, _) = SourcePattern::parse("data/authors.yml")
            .unwrap()
            .discover(root.path());
        assert_eq!(found, vec![root.path().join("data/authors.yml")]);

        let (absent, _) = SourcePattern::parse("data/categories.yml")
            .unwrap()
            .discover(root.path());
        assert!(absent.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_entries_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = write(outside.path(), "secret.md", "---\ntitle: x\n---\n");
        write(root.path(), "blog/real.md", "");
        std::os::unix::fs::symlink(&target, root.path().join("blog/linked.md")).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("blog/linked-dir"))
            .unwrap();

        let (blog, _) = SourcePattern::parse("blog/**/*.md")
            .unwrap()
            .discover(root.path());
        assert_eq!(blog, vec![root.path().join("blog/real.md")]);
    }

    #[test]
    fn markdown_front_matter_becomes_record() {
        let root = tempfile::tempdir().unwrap();
        let path = write(
            root.path(),
            "blog/hello.md",
            "---\ntitle: Hello\npublishedAt: 2024-01-15\ntags: [a, b]\n---\n\n# Body\n",
        );

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].value,
            json!({"title": "Hello", "publishedAt": "2024-01-15", "tags": ["a", "b"]})
        );
        assert_eq!(entries[0].label(), path.display().to_string());
    }

    #[test]
    fn markdown_without_front_matter_is_empty_object() {
        let root = tempfile::tempdir().unwrap();
        let path = write(root.path(), "landing/plain.md", "# Just a body\n");
        assert_eq!(read_entries(&path).unwrap()[0].value, json!({}));
    }

    #[test]
    fn unterminated_front_matter_is_a_parse_error() {
        let root = tempfile::tempdir().unwrap();
        let path = write(root.path(), "blog/broken.md", "---\ntitle: x\n");
        assert!(matches!(read_entries(&path), Err(ContentError::Parse { .. })));
    }

    #[test]
    fn yaml_lists_split_into_entries() {
        let root = tempfile::tempdir().unwrap();
        let path = write(
            root.path(),
            "data/categories.yml",
            "- title: Web\n  icon: i-web\n  slug: web\n- title: Ops\n  icon: i-ops\n  slug: ops\n",
        );

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, Some(1));
        assert_eq!(entries[1].value["slug"], "ops");
        assert!(entries[1].label().ends_with("categories.yml[1]"));
    }

    #[test]
    fn json_object_is_single_entry() {
        let root = tempfile::tempdir().unwrap();
        let path = write(root.path(), "data/one.json", r#"{"quote": "Great", "name": "Bo"}"#);
        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].index, None);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let path = write(root.path(), "data/table.csv", "a,b\n");
        assert!(matches!(read_entries(&path), Err(ContentError::Parse { .. })));
    }
}
