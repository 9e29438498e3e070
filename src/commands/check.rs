//! Check site content

use anyhow::Result;
use clap::ValueEnum;

use crate::Blog;

/// How the report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options for a check run
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    pub drafts: bool,
    pub format: OutputFormat,
    pub deny_warnings: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            drafts: false,
            format: OutputFormat::Text,
            deny_warnings: false,
        }
    }
}

/// Check the site, print the report, and fail if it has problems
pub fn run(blog: &Blog, options: CheckOptions) -> Result<()> {
    let report = blog.check(options.drafts)?;

    match options.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.render_json()?),
    }

    tracing::debug!(
        "Check finished: {} errors, {} warnings",
        report.errors,
        report.warnings
    );

    if report.errors > 0 {
        anyhow::bail!("{} error(s) found", report.errors);
    }
    if options.deny_warnings && report.warnings > 0 {
        anyhow::bail!("{} warning(s) found and warnings are denied", report.warnings);
    }

    Ok(())
}
