use std::path::PathBuf;

use clap::{Args, Subcommand};
use sitecontent_schema::{RegistryConfig, SchemaRegistry};

use crate::exit::{content_error, schema_error, CliResult};
use crate::output::OutputFormat;

pub mod check;
pub mod collections;
pub mod describe;
pub mod schema;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered collections.
    Collections(CollectionsArgs),
    /// Show the fields of a collection.
    Describe(DescribeArgs),
    /// Validate content files or an inline record against a collection.
    Validate(ValidateArgs),
    /// Validate every collection under a content directory.
    Check(CheckArgs),
    /// Print the JSON Schema of a collection for editor tooling.
    Schema(SchemaArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub format: OutputFormat,
    pub schema_dir: Option<PathBuf>,
    pub strict: bool,
}

impl Context {
    /// Built-in catalog plus any directory-defined collections.
    pub fn registry(&self) -> CliResult<SchemaRegistry> {
        let config = if self.strict {
            RegistryConfig::strict()
        } else {
            RegistryConfig::default()
        };
        let mut registry = sitecontent_content::registry_with_config(config)
            .map_err(|err| content_error("building catalog failed", err))?;

        if let Some(dir) = &self.schema_dir {
            let loaded = registry
                .load_directory(dir)
                .map_err(|err| schema_error(&format!("loading {} failed", dir.display()), err))?;
            tracing::info!(
                dir = %dir.display(),
                collections = ?loaded,
                "loaded collection definitions"
            );
        }
        Ok(registry)
    }
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Collections(args) => collections::run(args, ctx),
        Command::Describe(args) => describe::run(args, ctx),
        Command::Validate(args) => validate::run(args, ctx),
        Command::Check(args) => check::run(args, ctx),
        Command::Schema(args) => schema::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct CollectionsArgs {}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Collection name.
    pub collection: String,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Collection name.
    pub collection: String,
    /// Content files (.md front matter, .yml/.yaml, .json).
    #[arg(required_unless_present = "json", conflicts_with = "json")]
    pub files: Vec<PathBuf>,
    /// Inline JSON record.
    #[arg(long)]
    pub json: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Content root directory.
    #[arg(env = "SITECONTENT_CONTENT_DIR", default_value = "content")]
    pub content_dir: PathBuf,
    /// Exit non-zero when the reference report has findings.
    #[arg(long)]
    pub deny_findings: bool,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Collection name.
    pub collection: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
