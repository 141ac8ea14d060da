//! Batch execution.
//!
//! Runs the pipeline once per URL with bounded parallelism. Each run is an
//! independent task wrapped in a timeout, so a slow, failing, or panicking URL
//! never affects the others.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};

use crate::config::URL_PROCESSING_TIMEOUT;
use crate::error_handling::AnalysisError;
use crate::initialization::init_semaphore;
use crate::pipeline::{AnalysisOutcome, AnalysisSettings, Analyzer};

/// Result for one URL of a batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// URL as given.
    pub url: String,
    /// Whether the run produced an outcome.
    pub success: bool,
    /// Outcome of a successful run.
    pub result: Option<AnalysisOutcome>,
    /// Classified error of a failed run.
    pub error: Option<AnalysisError>,
    /// Seconds spent on this URL, including time waiting for retries.
    pub processing_time: f64,
}

/// Aggregate of a batch run. `successful + failed == total`.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Number of input URLs.
    pub total: usize,
    /// Runs that produced an outcome.
    pub successful: usize,
    /// Runs that failed.
    pub failed: usize,
    /// Per-URL results in input order.
    pub results: Vec<BatchItem>,
}

/// Analyzes every URL in `urls` with at most `max_concurrency` runs at once.
///
/// Each run is bounded by `URL_PROCESSING_TIMEOUT`.
pub async fn run_batch(
    analyzer: Arc<Analyzer>,
    urls: Vec<String>,
    settings: AnalysisSettings,
    max_concurrency: usize,
) -> BatchReport {
    run_batch_with_timeout(analyzer, urls, settings, max_concurrency, URL_PROCESSING_TIMEOUT).await
}

/// Like [`run_batch`], with an explicit per-URL timeout.
pub async fn run_batch_with_timeout(
    analyzer: Arc<Analyzer>,
    urls: Vec<String>,
    settings: AnalysisSettings,
    max_concurrency: usize,
    url_timeout: Duration,
) -> BatchReport {
    let total = urls.len();
    info!("Analyzing {} URL{}", total, if total == 1 { "" } else { "s" });

    let semaphore = init_semaphore(max_concurrency);
    let settings = Arc::new(settings);
    let mut tasks = FuturesUnordered::new();

    for (index, url) in urls.into_iter().enumerate() {
        let analyzer = Arc::clone(&analyzer);
        let settings = Arc::clone(&settings);
        let semaphore = Arc::clone(&semaphore);
        let task_url = url.clone();
        let stats = Arc::clone(analyzer.stats());

        let handle = tokio::spawn(async move {
            // Hold permit until the run completes
            let _permit = semaphore.acquire_owned().await.ok();
            let start = Instant::now();
            let result = match tokio::time::timeout(
                url_timeout,
                analyzer.analyze(&task_url, &settings),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    let error = AnalysisError::Timeout {
                        url: task_url.clone(),
                        seconds: url_timeout.as_secs(),
                    };
                    analyzer.stats().increment_error(error.error_type());
                    Err(error)
                }
            };
            (result, start.elapsed().as_secs_f64())
        });

        tasks.push(async move {
            let item = match handle.await {
                Ok((result, processing_time)) => to_item(url, result, processing_time),
                Err(join_error) => {
                    let error = AnalysisError::Aborted(join_error.to_string());
                    stats.increment_error(error.error_type());
                    to_item(url, Err(error), 0.0)
                }
            };
            (index, item)
        });
    }

    let mut slots: Vec<Option<BatchItem>> = vec![None; total];
    while let Some((index, item)) = tasks.next().await {
        debug!(
            "Finished {} ({})",
            item.url,
            if item.success { "ok" } else { "failed" }
        );
        slots[index] = Some(item);
    }

    let results: Vec<BatchItem> = slots.into_iter().flatten().collect();
    let successful = results.iter().filter(|item| item.success).count();
    BatchReport {
        total,
        successful,
        failed: total - successful,
        results,
    }
}

fn to_item(
    url: String,
    result: Result<AnalysisOutcome, AnalysisError>,
    processing_time: f64,
) -> BatchItem {
    match result {
        Ok(outcome) => BatchItem {
            url,
            success: true,
            result: Some(outcome),
            error: None,
            processing_time,
        },
        Err(error) => {
            warn!("Failed to analyze {url}: {error}");
            BatchItem {
                url,
                success: false,
                result: None,
                error: Some(error),
                processing_time,
            }
        }
    }
}
