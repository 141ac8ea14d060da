//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `web_analyzer` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Export and user-facing output
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use web_analyzer::app::{
    print_batch_summary, print_error_statistics, read_urls, validate_and_normalize_url,
};
use web_analyzer::config::{Opt, LLM_API_KEY_ENV};
use web_analyzer::initialization::init_logger_with;
use web_analyzer::{run_batch, Analyzer, Exporter, FileExporter};

#[tokio::main]
async fn main() -> Result<()> {
    // OPENAI_API_KEY may live in .env
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(opt).await {
        eprintln!("web_analyzer error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(opt: Opt) -> Result<()> {
    let mut raw_urls = opt.urls.clone();
    if let Some(path) = &opt.file {
        let from_file = read_urls(path)
            .await
            .with_context(|| format!("Failed to read URLs from {}", path.display()))?;
        raw_urls.extend(from_file);
    }

    let urls: Vec<String> = raw_urls
        .iter()
        .filter_map(|u| validate_and_normalize_url(u))
        .collect();
    if urls.is_empty() {
        anyhow::bail!("No valid URLs to analyze");
    }

    let config = opt.to_config(std::env::var(LLM_API_KEY_ENV).ok());
    let settings = opt.to_settings();
    let analyzer = Arc::new(
        Analyzer::from_config(&config)
            .await
            .context("Failed to initialize analyzer")?,
    );

    let start = Instant::now();
    let report = run_batch(Arc::clone(&analyzer), urls, settings, config.max_concurrency).await;

    if let Some(format) = opt.export {
        let exporter = FileExporter::new(&opt.output_dir);
        for outcome in report.results.iter().filter_map(|item| item.result.as_ref()) {
            match exporter.export(&outcome.record, format).await {
                Ok(path) => info!("Wrote {}", path.display()),
                Err(e) => warn!("Export of {} failed: {e}", outcome.record.url),
            }
        }
    }

    for item in &report.results {
        match (&item.result, &item.error) {
            (Some(outcome), _) => {
                let score = outcome
                    .record
                    .seo_analysis
                    .as_ref()
                    .map(|seo| format!("{} ({})", seo.score, seo.grade))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}\t{}\tSEO {}{}",
                    item.url,
                    outcome.record.status_code,
                    score,
                    if outcome.cached { "\tcached" } else { "" }
                );
            }
            (None, Some(e)) => error!("{}: {e}", item.url),
            (None, None) => {}
        }
    }

    print_error_statistics(analyzer.stats());
    print_batch_summary(&report, start.elapsed().as_secs_f64());
    println!("Results saved in {}", config.db_path.display());
    Ok(())
}
