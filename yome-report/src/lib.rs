//! yome-report library - per-gene knowledgebase reports
//!
//! Read-only access to a yome database plus the output formats of the
//! `yome-report` command.

use anyhow::{Context, Result};
use clap::ValueEnum;
use yome_common::db::Session;
use yome_common::report::build_report;

pub mod db;

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Left-aligned HTML table
    Html,
    /// Report rows as JSON
    Json,
}

/// Build the report for `locus_tag` and render it in `format`
pub async fn render_report(
    session: &mut Session,
    locus_tag: &str,
    format: OutputFormat,
) -> Result<String> {
    let report = build_report(session, locus_tag)
        .await
        .with_context(|| format!("Failed to build report for {}", locus_tag))?;

    match format {
        OutputFormat::Html => Ok(report.render().into_string()),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "locus_id": report.locus_id,
                "primary_name": report.primary_name,
                "features": report.features,
            });
            serde_json::to_string_pretty(&body).context("Failed to serialize report")
        }
    }
}
