//! yome-report - render the knowledgebase report for one gene
//!
//! Resolves the database path (CLI > YOME_DATABASE > config file > default),
//! opens it read-only and writes the report to stdout or a file.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};
use yome_common::config::{resolve_database_path, DATABASE_ENV_VAR};
use yome_common::db::Session;
use yome_common::human_time::format_duration;
use yome_report::{db, render_report, OutputFormat};

/// Command-line arguments for yome-report
#[derive(Parser, Debug)]
#[command(name = "yome-report")]
#[command(about = "Render the knowledgebase report for a gene")]
#[command(version)]
struct Args {
    /// Locus tag of the gene (e.g. b0001)
    locus_tag: String,

    /// Path to the yome database
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "html")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting yome-report v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let started = Instant::now();

    let cli_database = args.database.as_ref().map(|p| p.to_string_lossy().into_owned());
    let db_path = resolve_database_path(cli_database.as_deref(), DATABASE_ENV_VAR)?;
    info!("Database path: {}", db_path.display());

    let pool = match db::connect_readonly(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e);
        }
    };

    let mut session = Session::new(pool);
    let rendered = render_report(&mut session, &args.locus_tag, args.format).await?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    info!(
        "Report for {} finished in {}",
        args.locus_tag,
        format_duration(started.elapsed())
    );
    Ok(())
}
