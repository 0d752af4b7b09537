use serde::Serialize;
use sitecontent_schema::{FieldKind, FieldSpec};

use crate::cmd::{Context, DescribeArgs};
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_json, schema_id, table, OutputFormat};

#[derive(Debug, Serialize)]
struct FieldRow {
    path: String,
    kind: String,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
}

#[derive(Serialize)]
struct DescribeOutput<'a> {
    schema_id: String,
    collection: &'a str,
    #[serde(rename = "type")]
    source_type: &'static str,
    source: &'a str,
    fields: Vec<FieldRow>,
}

pub fn run(args: DescribeArgs, ctx: &Context) -> CliResult<i32> {
    let registry = ctx.registry()?;
    let schema = registry.get(&args.collection).ok_or_else(|| {
        schema_error(
            "describe failed",
            sitecontent_schema::SchemaError::UnknownCollection(args.collection.clone()),
        )
    })?;

    let mut rows = Vec::new();
    flatten_fields(&schema.fields, "", &mut rows);

    match ctx.format {
        OutputFormat::Json => print_json(&DescribeOutput {
            schema_id: schema_id("collection-fields"),
            collection: &schema.name,
            source_type: schema.source_type.as_str(),
            source: &schema.source,
            fields: rows,
        }),
        OutputFormat::Table => {
            let mut out = table(&["FIELD", "KIND", "REQUIRED", "DEFAULT"]);
            for row in &rows {
                out.add_row(vec![
                    row.path.clone(),
                    kind_with_constraints(row),
                    if row.required { "yes" } else { "no" }.to_string(),
                    row.default
                        .as_ref()
                        .map_or_else(|| "-".to_string(), ToString::to_string),
                ]);
            }
            println!("{} ({}, {})", schema.name, schema.source_type, schema.source);
            println!("{out}");
        }
        OutputFormat::Pretty => {
            println!("{} ({}, {})", schema.name, schema.source_type, schema.source);
            for row in &rows {
                let marker = if row.required { "*" } else { " " };
                match &row.default {
                    Some(default) => println!(
                        "  {marker} {:<24} {} = {default}",
                        row.path,
                        kind_with_constraints(row)
                    ),
                    None => println!("  {marker} {:<24} {}", row.path, kind_with_constraints(row)),
                }
            }
        }
    }

    Ok(SUCCESS)
}

/// Nested shape fields are listed under their dotted path; `[]` marks array items.
fn flatten_fields(fields: &[FieldSpec], prefix: &str, rows: &mut Vec<FieldRow>) {
    for field in fields {
        let path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        rows.push(FieldRow {
            path: path.clone(),
            kind: field.kind.name(),
            required: field.is_required(),
            default: field.default.as_ref().map(|value| value.to_json()),
            min_length: field.min_len,
        });

        match &field.kind {
            FieldKind::Object(shape) => flatten_fields(&shape.fields, &path, rows),
            FieldKind::Array(item) => {
                if let FieldKind::Object(shape) = item.as_ref() {
                    flatten_fields(&shape.fields, &format!("{path}[]"), rows);
                }
            }
            _ => {}
        }
    }
}

fn kind_with_constraints(row: &FieldRow) -> String {
    match row.min_length {
        Some(min) => format!("{} (min length {min})", row.kind),
        None => row.kind.clone(),
    }
}
