use crate::cmd::{Context, SchemaArgs};
use crate::exit::{schema_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: SchemaArgs, ctx: &Context) -> CliResult<i32> {
    let registry = ctx.registry()?;
    let document = registry
        .json_schema(&args.collection)
        .map_err(|err| schema_error("schema export failed", err))?;

    let rendered = match ctx.format {
        OutputFormat::Json => serde_json::to_string(&document),
        OutputFormat::Table | OutputFormat::Pretty => serde_json::to_string_pretty(&document),
    }
    .map_err(|err| CliError::new(INTERNAL, format!("schema export failed: {err}")))?;

    println!("{rendered}");
    Ok(SUCCESS)
}
