use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sitecontent_content::{EntryOutcome, FindingKind, ReferenceFinding, SourceFailure};
use sitecontent_schema::ValidationError;

const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/sitecontent/cli/v1";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn schema_id(name: &str) -> String {
    format!("{SCHEMA_BASE}/{name}.schema.json")
}

pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    collection: &'a str,
    entry: &'a str,
    valid: bool,
    errors: Vec<&'a ValidationError>,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    schema_id: String,
    valid: usize,
    invalid: usize,
    entries: Vec<EntryOutput<'a>>,
    failures: &'a [SourceFailure],
    findings: &'a [ReferenceFinding],
}

/// Print per-entry validation outcomes, unreadable files, then reference
/// findings. Unreadable files count as invalid.
pub fn print_report(
    report_name: &str,
    outcomes: &[EntryOutcome],
    failures: &[SourceFailure],
    findings: &[ReferenceFinding],
    format: OutputFormat,
) {
    let rejected = outcomes.iter().filter(|o| o.result.is_err()).count();
    let valid = outcomes.len() - rejected;
    let invalid = rejected + failures.len();

    match format {
        OutputFormat::Json => {
            let entries = outcomes
                .iter()
                .map(|outcome| EntryOutput {
                    collection: &outcome.collection,
                    entry: &outcome.entry,
                    valid: outcome.result.is_ok(),
                    errors: match &outcome.result {
                        Ok(_) => Vec::new(),
                        Err(errors) => errors.iter().collect(),
                    },
                })
                .collect();
            print_json(&ReportOutput {
                schema_id: schema_id(report_name),
                valid,
                invalid,
                entries,
                failures,
                findings,
            });
        }
        OutputFormat::Table => {
            let mut entries = table(&["COLLECTION", "ENTRY", "STATUS", "DETAIL"]);
            for outcome in outcomes {
                let (status, detail) = match &outcome.result {
                    Ok(_) => ("ok", String::new()),
                    Err(errors) => (
                        "invalid",
                        errors
                            .iter()
                            .map(|err| format!("{}: {}", err.path, issue_detail(err)))
                            .collect::<Vec<_>>()
                            .join("\n"),
                    ),
                };
                entries.add_row(vec![
                    outcome.collection.clone(),
                    outcome.entry.clone(),
                    status.to_string(),
                    detail,
                ]);
            }
            for failure in failures {
                entries.add_row(vec![
                    failure.collection.clone(),
                    failure.entry.clone(),
                    "unreadable".to_string(),
                    failure.message.clone(),
                ]);
            }
            println!("{entries}");

            if !findings.is_empty() {
                let mut refs = table(&["FINDING", "COLLECTION", "ENTRY", "VALUE"]);
                for finding in findings {
                    refs.add_row(vec![
                        finding_label(finding.kind).to_string(),
                        finding.collection.clone(),
                        finding.entry.clone(),
                        finding.value.clone(),
                    ]);
                }
                println!("{refs}");
            }
            println!("{valid} valid, {invalid} invalid, {} findings", findings.len());
        }
        OutputFormat::Pretty => {
            for outcome in outcomes {
                match &outcome.result {
                    Ok(_) => println!("ok      {} ({})", outcome.entry, outcome.collection),
                    Err(errors) => {
                        println!("invalid {} ({})", outcome.entry, outcome.collection);
                        for err in errors {
                            println!("          {err}");
                        }
                    }
                }
            }
            for failure in failures {
                println!("error   {} ({})", failure.entry, failure.collection);
                println!("          {}", failure.message);
            }
            for finding in findings {
                println!(
                    "warning {}: {} {} -> {}",
                    finding_label(finding.kind),
                    finding.collection,
                    finding.entry,
                    finding.value
                );
            }
            println!("\n{valid} valid, {invalid} invalid, {} findings", findings.len());
        }
    }
}

fn issue_detail(err: &ValidationError) -> String {
    match err.issue {
        sitecontent_schema::Issue::Missing => format!("missing {}", err.expected),
        sitecontent_schema::Issue::Unexpected => "unexpected field".to_string(),
        _ => format!("expected {}, found {}", err.expected, err.actual),
    }
}

pub fn finding_label(kind: FindingKind) -> &'static str {
    match kind {
        FindingKind::UnknownAuthor => "unknown author",
        FindingKind::UnknownCategory => "unknown category",
        FindingKind::DuplicateSlug => "duplicate slug",
    }
}
