//! Soft-reference report over validated records.
//!
//! Validation never checks that `author` names an existing author or that
//! `category` names an existing category slug. This pass does, and also
//! flags slugs used more than once within a collection. Findings are
//! advisory; nothing here rejects a record.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use sitecontent_schema::Record;

use crate::catalog::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnknownAuthor,
    UnknownCategory,
    DuplicateSlug,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceFinding {
    pub kind: FindingKind,
    pub collection: String,
    /// Slug (or title/name) of the entry the finding is about.
    pub entry: String,
    /// The offending value.
    pub value: String,
}

const CATEGORIZED: [Collection; 3] = [Collection::Blog, Collection::Services, Collection::Projects];
const SLUGGED: [Collection; 4] = [
    Collection::Blog,
    Collection::Services,
    Collection::Projects,
    Collection::Categories,
];

/// Check soft references and slug uniqueness across a set of records.
pub fn check_references(records: &[Record]) -> Vec<ReferenceFinding> {
    let authors: HashSet<&str> = records_of(records, Collection::Authors)
        .filter_map(|record| record.get_str("name"))
        .collect();
    let categories: HashSet<&str> = records_of(records, Collection::Categories)
        .filter_map(|record| record.get_str("slug"))
        .collect();

    let mut findings = Vec::new();

    for record in records_of(records, Collection::Blog) {
        if let Some(author) = record.get_str("author") {
            if !authors.contains(author) {
                findings.push(finding(FindingKind::UnknownAuthor, record, author));
            }
        }
    }

    for collection in CATEGORIZED {
        for record in records_of(records, collection) {
            if let Some(category) = record.get_str("category") {
                if !categories.contains(category) {
                    findings.push(finding(FindingKind::UnknownCategory, record, category));
                }
            }
        }
    }

    for collection in SLUGGED {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records_of(records, collection) {
            if let Some(slug) = record.get_str("slug") {
                *seen.entry(slug).or_default() += 1;
            }
        }
        for (slug, count) in seen {
            if count > 1 {
                findings.push(ReferenceFinding {
                    kind: FindingKind::DuplicateSlug,
                    collection: collection.as_str().to_string(),
                    entry: slug.to_string(),
                    value: format!("{count} entries"),
                });
            }
        }
    }

    tracing::debug!(records = records.len(), findings = findings.len(), "checked references");
    findings
}

fn records_of(records: &[Record], collection: Collection) -> impl Iterator<Item = &Record> {
    records
        .iter()
        .filter(move |record| record.collection() == collection.as_str())
}

fn finding(kind: FindingKind, record: &Record, value: &str) -> ReferenceFinding {
    ReferenceFinding {
        kind,
        collection: record.collection().to_string(),
        entry: entry_label(record),
        value: value.to_string(),
    }
}

fn entry_label(record: &Record) -> String {
    ["slug", "title", "name"]
        .iter()
        .find_map(|field| record.get_str(field))
        .unwrap_or("?")
        .to_string()
}
