//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::run::BatchReport;

/// Prints a one-line summary of a batch run.
pub fn print_batch_summary(report: &BatchReport, elapsed_seconds: f64) {
    info!(
        "✅ Analyzed {} URL{} ({} succeeded, {} failed) in {:.1}s",
        report.total,
        if report.total == 1 { "" } else { "s" },
        report.successful,
        report.failed,
        elapsed_seconds
    );
}

/// Prints error, warning, and info statistics to the log.
///
/// Only categories with a non-zero count are listed.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    let total_errors = error_stats.total_errors();
    let total_warnings = error_stats.total_warnings();
    let total_info = error_stats.total_info();

    if total_errors > 0 {
        info!("Error Counts ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }

    if total_warnings > 0 {
        info!("Warning Counts ({} total):", total_warnings);
        for warning_type in WarningType::iter() {
            let count = error_stats.get_warning_count(warning_type);
            if count > 0 {
                info!("   {}: {}", warning_type.as_str(), count);
            }
        }
    }

    if total_info > 0 {
        info!("Info Counts ({} total):", total_info);
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                info!("   {}: {}", info_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_empty() {
        print_error_statistics(&ProcessingStats::new());
    }

    #[test]
    fn test_print_error_statistics_all_categories() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::HttpRequestTimeoutError);
        stats.increment_warning(WarningType::EnrichmentFailed);
        stats.increment_info(InfoType::CacheHit);
        print_error_statistics(&stats);
    }

    #[test]
    fn test_print_batch_summary() {
        let report = BatchReport {
            total: 1,
            successful: 1,
            failed: 0,
            results: Vec::new(),
        };
        print_batch_summary(&report, 0.25);
    }
}
