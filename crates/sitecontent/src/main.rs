mod cmd;
mod exit;
mod logging;
mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::{Command, Context};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "sitecontent", version, about = "Content collection validator")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Directory of `<name>.collection.json` definitions to register alongside the catalog.
    #[arg(long, value_name = "DIR", env = "SITECONTENT_SCHEMA_DIR", global = true)]
    schema_dir: Option<PathBuf>,

    /// Reject fields a collection does not declare.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let ctx = Context {
        format: cli.format.unwrap_or_else(OutputFormat::default_for_stdout),
        schema_dir: cli.schema_dir,
        strict: cli.strict,
    };
    let result = cmd::run(cli.command, &ctx);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "sitecontent",
            "validate",
            "blog",
            "content/blog/first.md",
            "content/blog/second.md",
        ])
        .expect("validate args should parse");

        match cli.command {
            Command::Validate(args) => {
                assert_eq!(args.collection, "blog");
                assert_eq!(args.files.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_files_with_inline_json() {
        let err = Cli::try_parse_from([
            "sitecontent",
            "validate",
            "categories",
            "a.yml",
            "--json",
            "{\"title\":\"x\"}",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn validate_requires_an_input() {
        let err = Cli::try_parse_from(["sitecontent", "validate", "blog"])
            .expect_err("missing input should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "sitecontent",
            "check",
            "site/content",
            "--strict",
            "--deny-findings",
            "--format",
            "json",
        ])
        .expect("check args should parse");

        assert!(cli.strict);
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.content_dir, PathBuf::from("site/content"));
                assert!(args.deny_findings);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
