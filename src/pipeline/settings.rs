//! Per-request analysis settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_MAX_LINKS};

/// Stage toggles and limits for one analysis.
///
/// Settings gate the optional pipeline stages and are part of the cache
/// fingerprint. Missing fields take their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Run metadata extraction.
    pub include_metadata: bool,
    /// Keep the generic meta tag map in the metadata.
    pub include_meta_tags: bool,
    /// Run link extraction.
    pub include_links: bool,
    /// Run image extraction.
    pub include_images: bool,
    /// Run visible text extraction.
    pub include_content: bool,
    /// Run heading extraction.
    pub include_headings: bool,
    /// Keep response headers on the record.
    pub include_headers: bool,
    /// Record fetch performance facts.
    pub include_performance: bool,
    /// Run SEO scoring.
    pub include_seo_analysis: bool,
    /// Run language model enrichment.
    pub include_ai_analysis: bool,
    /// Maximum characters of page text kept.
    pub max_content_length: usize,
    /// Maximum link records kept.
    pub max_links: usize,
    /// Follow HTTP redirects.
    pub follow_redirects: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            include_metadata: true,
            include_meta_tags: true,
            include_links: true,
            include_images: true,
            include_content: true,
            include_headings: true,
            include_headers: true,
            include_performance: true,
            include_seo_analysis: true,
            include_ai_analysis: true,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_links: DEFAULT_MAX_LINKS,
            follow_redirects: true,
        }
    }
}

impl AnalysisSettings {
    /// Returns a stable serialization: compact JSON with keys sorted.
    ///
    /// Two logically equal settings always produce the same string, whatever
    /// field order they were deserialized from.
    pub fn canonical_form(&self) -> String {
        let fields: BTreeMap<&str, String> = [
            ("follow_redirects", self.follow_redirects.to_string()),
            ("include_ai_analysis", self.include_ai_analysis.to_string()),
            ("include_content", self.include_content.to_string()),
            ("include_headers", self.include_headers.to_string()),
            ("include_headings", self.include_headings.to_string()),
            ("include_images", self.include_images.to_string()),
            ("include_links", self.include_links.to_string()),
            ("include_meta_tags", self.include_meta_tags.to_string()),
            ("include_metadata", self.include_metadata.to_string()),
            ("include_performance", self.include_performance.to_string()),
            ("include_seo_analysis", self.include_seo_analysis.to_string()),
            ("max_content_length", self.max_content_length.to_string()),
            ("max_links", self.max_links.to_string()),
        ]
        .into_iter()
        .collect();

        let body = fields
            .iter()
            .map(|(key, value)| format!("\"{key}\":{value}"))
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{body}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AnalysisSettings::default();
        assert!(settings.include_metadata && settings.include_ai_analysis);
        assert!(settings.follow_redirects);
        assert_eq!(settings.max_links, 50);
        assert_eq!(settings.max_content_length, 5000);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: AnalysisSettings =
            serde_json::from_str(r#"{"max_links": 10, "include_images": false}"#)
                .expect("partial settings");
        assert_eq!(settings.max_links, 10);
        assert!(!settings.include_images);
        assert!(settings.include_links);
        assert_eq!(settings.max_content_length, 5000);
    }

    #[test]
    fn test_canonical_form_is_sorted_json() {
        let canonical = AnalysisSettings::default().canonical_form();
        let parsed: serde_json::Value =
            serde_json::from_str(&canonical).expect("canonical form is JSON");
        assert_eq!(parsed["max_links"], 50);
        assert!(canonical.starts_with("{\"follow_redirects\":true,\"include_ai_analysis\""));
        assert!(canonical.ends_with("\"max_links\":50}"));
    }

    #[test]
    fn test_canonical_form_ignores_input_field_order() {
        let a: AnalysisSettings =
            serde_json::from_str(r#"{"max_links": 7, "include_content": false}"#).expect("a");
        let b: AnalysisSettings =
            serde_json::from_str(r#"{"include_content": false, "max_links": 7}"#).expect("b");
        assert_eq!(a.canonical_form(), b.canonical_form());
        assert_ne!(a.canonical_form(), AnalysisSettings::default().canonical_form());
    }
}
