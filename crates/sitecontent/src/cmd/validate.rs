use std::path::PathBuf;

use sitecontent_content::{read_entries, validate_entry, EntryOutcome, RawEntry};

use crate::cmd::{Context, ValidateArgs};
use crate::exit::{content_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::print_report;

pub fn run(args: ValidateArgs, ctx: &Context) -> CliResult<i32> {
    let registry = ctx.registry()?;
    if !registry.contains(&args.collection) {
        return Err(schema_error(
            "validate failed",
            sitecontent_schema::SchemaError::UnknownCollection(args.collection),
        ));
    }

    let entries = resolve_entries(&args)?;
    let mut outcomes: Vec<EntryOutcome> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let outcome = validate_entry(&registry, &args.collection, entry)
            .map_err(|err| content_error("validate failed", err))?;
        outcomes.push(outcome);
    }

    let invalid = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(
        collection = %args.collection,
        entries = outcomes.len(),
        invalid,
        "validation finished"
    );
    print_report("validate-report", &outcomes, &[], &[], ctx.format);

    Ok(if invalid > 0 { DATA_INVALID } else { SUCCESS })
}

fn resolve_entries(args: &ValidateArgs) -> CliResult<Vec<RawEntry>> {
    if let Some(json) = &args.json {
        let value = serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")))?;
        return Ok(vec![RawEntry {
            path: PathBuf::from("<inline>"),
            index: None,
            value,
        }]);
    }

    let mut entries = Vec::new();
    for path in &args.files {
        let read = read_entries(path)
            .map_err(|err| content_error(&format!("failed reading {}", path.display()), err))?;
        entries.extend(read);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_json_becomes_single_entry() {
        let args = ValidateArgs {
            collection: "categories".to_string(),
            files: Vec::new(),
            json: Some(r#"{"title":"Web"}"#.to_string()),
        };
        let entries = resolve_entries(&args).expect("inline json should parse");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label(), "<inline>");
    }

    #[test]
    fn invalid_inline_json_is_usage_error() {
        let args = ValidateArgs {
            collection: "categories".to_string(),
            files: Vec::new(),
            json: Some("{nope".to_string()),
        };
        let err = resolve_entries(&args).expect_err("bad json should fail");
        assert_eq!(err.code, USAGE);
    }
}
