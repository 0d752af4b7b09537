use serde::Serialize;
use sitecontent_schema::CollectionSchema;

use crate::cmd::{CollectionsArgs, Context};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, schema_id, table, OutputFormat};

#[derive(Serialize)]
struct CollectionSummary<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    source_type: &'static str,
    source: &'a str,
    fields: usize,
    required: usize,
}

#[derive(Serialize)]
struct CollectionsOutput<'a> {
    schema_id: String,
    collections: Vec<CollectionSummary<'a>>,
}

pub fn run(_args: CollectionsArgs, ctx: &Context) -> CliResult<i32> {
    let registry = ctx.registry()?;
    let collections: Vec<CollectionSummary<'_>> = registry.schemas().map(summarize).collect();

    match ctx.format {
        OutputFormat::Json => print_json(&CollectionsOutput {
            schema_id: schema_id("collections"),
            collections,
        }),
        OutputFormat::Table => {
            let mut out = table(&["COLLECTION", "TYPE", "SOURCE", "FIELDS", "REQUIRED"]);
            for c in &collections {
                out.add_row(vec![
                    c.name.to_string(),
                    c.source_type.to_string(),
                    c.source.to_string(),
                    c.fields.to_string(),
                    c.required.to_string(),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for c in &collections {
                println!(
                    "{:<14} {:<5} {:<24} {} fields ({} required)",
                    c.name, c.source_type, c.source, c.fields, c.required
                );
            }
        }
    }

    Ok(SUCCESS)
}

fn summarize(schema: &CollectionSchema) -> CollectionSummary<'_> {
    CollectionSummary {
        name: &schema.name,
        source_type: schema.source_type.as_str(),
        source: &schema.source,
        fields: schema.fields.len(),
        required: schema.required_fields().count(),
    }
}
