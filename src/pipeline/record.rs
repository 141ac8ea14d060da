//! The assembled analysis record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnalysisSettings;
use crate::enrich::Enrichment;
use crate::parse::ExtractionResult;
use crate::seo::SeoReport;

/// Derived counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordStats {
    /// Seconds from the start of the run to assembly.
    pub processing_time: f64,
    /// Characters of cleaned page text (un-truncated).
    pub content_length: usize,
    /// Links found on the page.
    pub links_count: usize,
    /// Images found on the page.
    pub images_count: usize,
}

/// Everything known about one analyzed page.
///
/// Extraction fields are flattened to the top level, so a record serializes
/// as `{url, ..., metadata, links, images, headings, content, performance,
/// seo_analysis, ai_analysis, stats}` with skipped stages absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// URL as requested.
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    /// HTTP status of the final response.
    pub status_code: u16,
    /// Page title, empty when absent or when metadata was skipped.
    pub title: String,
    /// When the record was assembled.
    pub timestamp: DateTime<Utc>,
    /// Response headers, kept when `include_headers` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    /// Settings the analysis ran with.
    pub settings: AnalysisSettings,
    /// Extraction stage outputs.
    #[serde(flatten)]
    pub extraction: ExtractionResult,
    /// SEO report, absent when scoring did not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_analysis: Option<SeoReport>,
    /// Enrichment output or error marker, absent when enrichment did not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<Enrichment>,
    /// Derived counters.
    #[serde(default)]
    pub stats: RecordStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{Content, Metadata};
    use serde_json::json;

    fn record() -> AnalysisRecord {
        AnalysisRecord {
            url: "https://example.com".to_string(),
            final_url: "https://example.com/".to_string(),
            status_code: 200,
            title: "Example".to_string(),
            timestamp: Utc::now(),
            headers: None,
            settings: AnalysisSettings::default(),
            extraction: ExtractionResult {
                metadata: Some(Metadata {
                    title: "Example".to_string(),
                    ..Default::default()
                }),
                content: Some(Content {
                    text: "hello".to_string(),
                    length: 5,
                    truncated: false,
                    word_count: 1,
                }),
                ..Default::default()
            },
            seo_analysis: None,
            ai_analysis: None,
            stats: RecordStats::default(),
        }
    }

    #[test]
    fn test_skipped_stages_are_absent_in_json() {
        let value = serde_json::to_value(record()).expect("serialize");
        assert!(value.get("metadata").is_some());
        assert_eq!(value["content"]["length"], json!(5));
        for absent in ["links", "images", "headings", "performance", "seo_analysis", "ai_analysis", "headers"] {
            assert!(value.get(absent).is_none(), "{absent} should be absent");
        }
    }

    #[test]
    fn test_record_json_round_trip() {
        let original = record();
        let json = serde_json::to_string(&original).expect("serialize");
        let decoded: AnalysisRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(decoded, original);
    }
}
