use sitecontent_content::check_tree;

use crate::cmd::{CheckArgs, Context};
use crate::exit::{content_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::{finding_label, print_report};

pub fn run(args: CheckArgs, ctx: &Context) -> CliResult<i32> {
    if !args.content_dir.is_dir() {
        return Err(CliError::new(
            FAILURE,
            format!("{} is not a directory", args.content_dir.display()),
        ));
    }

    let registry = ctx.registry()?;
    let report = check_tree(&args.content_dir, &registry).map_err(|err| {
        content_error(&format!("checking {} failed", args.content_dir.display()), err)
    })?;

    for finding in &report.findings {
        tracing::warn!(
            collection = %finding.collection,
            entry = %finding.entry,
            value = %finding.value,
            "{}",
            finding_label(finding.kind)
        );
    }
    tracing::info!(
        dir = %args.content_dir.display(),
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        unreadable = report.failures.len(),
        findings = report.findings.len(),
        "content check finished"
    );

    print_report(
        "check-report",
        &report.entries,
        &report.failures,
        &report.findings,
        ctx.format,
    );

    if report.invalid_count() > 0 || (args.deny_findings && !report.findings.is_empty()) {
        Ok(DATA_INVALID)
    } else {
        Ok(SUCCESS)
    }
}
