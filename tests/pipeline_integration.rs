//! Integration tests for the analysis pipeline.
//!
//! Collaborators are faked so each stage's failure handling can be driven
//! directly; the store is an in-memory SQLite database.

use std::sync::Arc;

use web_analyzer::cache::derive_cache_key;
use web_analyzer::config::AI_CONTENT_PREVIEW_CHARS;
use web_analyzer::enrich::{build_analysis_prompt, DisabledLanguageModel, Enrichment};
use web_analyzer::error_handling::{
    AnalysisError, EnrichmentError, ErrorType, FetchError, InfoType, WarningType,
};
use web_analyzer::storage::Store;
use web_analyzer::{AnalysisRecord, AnalysisSettings, Analyzer, Grade};

#[path = "helpers.rs"]
mod helpers;

use helpers::{
    analyzer_with, memory_cache, sample_html, FailingStore, FakeLanguageModel, StaticFetcher,
};

const URL: &str = "https://shop.example/widgets";

/// Compares records after a JSON round trip, where the float timing may move by an ulp.
fn assert_same_record(actual: &AnalysisRecord, expected: &AnalysisRecord) {
    assert!((actual.stats.processing_time - expected.stats.processing_time).abs() < 1e-9);
    let mut actual = actual.clone();
    actual.stats.processing_time = expected.stats.processing_time;
    assert_eq!(&actual, expected);
}

#[tokio::test]
async fn test_full_analysis_is_persisted_and_cached() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, store) = analyzer_with(fetcher.clone(), Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings::default();

    let outcome = analyzer.analyze(URL, &settings).await.expect("analysis");
    assert!(!outcome.cached);
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);

    let record = &outcome.record;
    assert_eq!(record.url, URL);
    assert_eq!(record.status_code, 200);
    assert_eq!(record.title, "Widgets and Gadgets for the Modern Workshop");

    let links = record.extraction.links.as_ref().expect("links");
    assert_eq!(links.total, 2);
    assert_eq!(links.total_internal, 1);
    assert_eq!(links.total_external, 1);

    let images = record.extraction.images.as_ref().expect("images");
    assert_eq!(images.with_alt, 1);
    assert_eq!(images.without_alt, 1);

    assert_eq!(record.stats.links_count, 2);
    assert_eq!(record.stats.images_count, 2);
    assert!(record.seo_analysis.is_some());
    assert!(record.ai_analysis.is_none(), "disabled client adds nothing");
    assert!(record.headers.is_some());

    let id = outcome.id.expect("persisted");
    let stored = store.get(id).await.expect("stored record");
    assert_same_record(&stored, record);

    let cached = analyzer
        .cache()
        .get(&derive_cache_key(URL, &settings))
        .await;
    assert!(cached.is_some(), "record should be cached after assembly");

    let stats = analyzer.stats();
    assert_eq!(stats.get_info_count(InfoType::CacheMiss), 1);
    assert_eq!(stats.get_info_count(InfoType::EnrichmentSkipped), 1);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_cache_hit_skips_fetch_but_persists_again() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, store) = analyzer_with(fetcher.clone(), Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings::default();

    let first = analyzer.analyze(URL, &settings).await.expect("first run");
    let second = analyzer.analyze(URL, &settings).await.expect("second run");

    assert!(second.cached);
    assert_same_record(&second.record, &first.record);
    assert_eq!(fetcher.calls(), 1, "cache hit must not fetch");
    assert_ne!(second.id, first.id);
    assert_eq!(store.list(0, 10).await.expect("list").len(), 2);
    assert_eq!(analyzer.stats().get_info_count(InfoType::CacheHit), 1);
}

#[tokio::test]
async fn test_different_settings_do_not_share_cache_entries() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, _store) = analyzer_with(fetcher.clone(), Arc::new(DisabledLanguageModel)).await;

    let defaults = AnalysisSettings::default();
    let fewer_links = AnalysisSettings {
        max_links: 1,
        ..Default::default()
    };

    analyzer.analyze(URL, &defaults).await.expect("defaults");
    let outcome = analyzer.analyze(URL, &fewer_links).await.expect("fewer links");

    assert!(!outcome.cached);
    assert_eq!(fetcher.calls(), 2);
    let links = outcome.record.extraction.links.expect("links");
    assert!(links.all.len() <= 1);
    assert_eq!(links.total, 2, "totals count every link found");
}

#[tokio::test]
async fn test_disabled_stages_are_absent() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, _store) = analyzer_with(fetcher, Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings {
        include_links: false,
        include_images: false,
        include_headings: false,
        include_headers: false,
        include_performance: false,
        include_ai_analysis: false,
        ..Default::default()
    };

    let record = analyzer.analyze(URL, &settings).await.expect("analysis").record;
    let value = serde_json::to_value(&record).expect("serialize");
    for absent in ["links", "images", "headings", "headers", "performance", "ai_analysis"] {
        assert!(value.get(absent).is_none(), "{absent} should be absent");
    }
    assert!(value.get("metadata").is_some());
    assert!(value.get("content").is_some());
    assert!(value.get("seo_analysis").is_some());
    assert_eq!(record.stats.links_count, 0);
    assert_eq!(
        analyzer.stats().get_info_count(InfoType::EnrichmentSkipped),
        0,
        "enrichment was not requested"
    );
}

#[tokio::test]
async fn test_scoring_requires_metadata_and_content() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, _store) = analyzer_with(fetcher, Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings {
        include_content: false,
        ..Default::default()
    };

    let record = analyzer.analyze(URL, &settings).await.expect("analysis").record;
    assert!(record.seo_analysis.is_none());
    assert!(record.extraction.metadata.is_some());
}

#[tokio::test]
async fn test_fetch_failure_is_fatal_and_not_cached() {
    let fetcher = Arc::new(StaticFetcher::new().failing(
        URL,
        FetchError::Status {
            url: URL.to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        },
    ));
    let (analyzer, store) = analyzer_with(fetcher, Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings::default();

    let err = analyzer
        .analyze(URL, &settings)
        .await
        .expect_err("404 is fatal");
    assert!(matches!(
        err,
        AnalysisError::Fetch(FetchError::Status { status: 404, .. })
    ));
    assert!(analyzer
        .cache()
        .get(&derive_cache_key(URL, &settings))
        .await
        .is_none());
    assert!(store.list(0, 10).await.expect("list").is_empty());
    assert_eq!(
        analyzer.stats().get_error_count(ErrorType::HttpRequestNotFound),
        1
    );
}

#[tokio::test]
async fn test_enrichment_failure_leaves_error_marker() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let llm = Arc::new(FakeLanguageModel::failing(EnrichmentError::Request(
        "connection reset".to_string(),
    )));
    let (analyzer, _store) = analyzer_with(fetcher, llm.clone()).await;

    let outcome = analyzer
        .analyze(URL, &AnalysisSettings::default())
        .await
        .expect("enrichment failure is not fatal");

    assert_eq!(
        outcome.record.ai_analysis,
        Some(Enrichment::Failed {
            error: "AI analysis failed: connection reset".to_string()
        })
    );
    assert!(outcome.record.seo_analysis.is_some());
    assert!(outcome.id.is_some());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(
        analyzer.stats().get_warning_count(WarningType::EnrichmentFailed),
        1
    );
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_enrichment_receives_page_text_when_content_stage_is_off() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let llm = Arc::new(FakeLanguageModel::succeeding());
    let (analyzer, _store) = analyzer_with(fetcher, llm.clone()).await;
    let settings = AnalysisSettings {
        include_content: false,
        ..Default::default()
    };

    let record = analyzer.analyze(URL, &settings).await.expect("analysis").record;
    assert!(matches!(record.ai_analysis, Some(Enrichment::Completed(ref p)) if p.success));
    assert!(record.extraction.content.is_none());

    let seen = llm.seen_content.lock().expect("lock poisoned");
    assert!(seen[0].contains("Widgets are small and useful."));
}

#[tokio::test]
async fn test_long_page_text_is_marked_as_cut_in_prompt() {
    let body = format!(
        "<html><head><title>Long</title></head><body><p>{}</p></body></html>",
        "lorem ".repeat(1000)
    );
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &body));
    let llm = Arc::new(FakeLanguageModel::succeeding());
    let (analyzer, _store) = analyzer_with(fetcher, llm.clone()).await;
    let settings = AnalysisSettings {
        include_content: false,
        ..Default::default()
    };

    analyzer.analyze(URL, &settings).await.expect("analysis");

    let seen = llm.seen_content.lock().expect("lock poisoned");
    assert!(seen[0].chars().count() > AI_CONTENT_PREVIEW_CHARS);
    let prompt = build_analysis_prompt(&seen[0], None, None, None);
    assert!(prompt.contains("...\n\nPlease provide analysis"));
}

#[tokio::test]
async fn test_persist_failure_is_a_warning() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let analyzer = Analyzer::new(
        fetcher,
        Arc::new(DisabledLanguageModel),
        Arc::new(FailingStore),
        memory_cache(),
    );

    let outcome = analyzer
        .analyze(URL, &AnalysisSettings::default())
        .await
        .expect("persist failure is not fatal");

    assert!(outcome.id.is_none());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].starts_with("Failed to persist analysis"));
    assert_eq!(outcome.record.url, URL);
    assert_eq!(
        analyzer.stats().get_warning_count(WarningType::PersistFailed),
        1
    );
}

#[tokio::test]
async fn test_undecodable_cache_payload_is_a_miss() {
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &sample_html()));
    let (analyzer, _store) = analyzer_with(fetcher.clone(), Arc::new(DisabledLanguageModel)).await;
    let settings = AnalysisSettings::default();
    let key = derive_cache_key(URL, &settings);

    assert!(
        analyzer
            .cache()
            .set(&key, &serde_json::json!({"not": "a record"}), None)
            .await
    );

    let outcome = analyzer.analyze(URL, &settings).await.expect("analysis");
    assert!(!outcome.cached);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(
        analyzer.stats().get_warning_count(WarningType::CacheReadFailed),
        1
    );
}

#[tokio::test]
async fn test_scenario_b_page_scores_f() {
    let html = format!(
        "<html><body><p>{}</p><a href=\"/one\">one</a>\
         <img src=\"a.png\"><img src=\"b.png\"><img src=\"c.png\"></body></html>",
        "x".repeat(100)
    );
    let fetcher = Arc::new(StaticFetcher::new().page(URL, &html));
    let (analyzer, _store) = analyzer_with(fetcher, Arc::new(DisabledLanguageModel)).await;

    let outcome = analyzer
        .analyze(URL, &AnalysisSettings::default())
        .await
        .expect("analysis");
    let seo = outcome.record.seo_analysis.expect("scored");
    assert_eq!(seo.score, 0);
    assert_eq!(seo.grade, Grade::F);
    assert_eq!(outcome.record.title, "");
    let stats = analyzer.stats();
    assert_eq!(stats.get_warning_count(WarningType::MissingTitle), 1);
    assert_eq!(stats.get_warning_count(WarningType::MissingMetaDescription), 1);
}

#[tokio::test]
async fn test_analyzer_from_config_end_to_end() {
    use httptest::{matchers::*, responders::*, Expectation, Server};
    use web_analyzer::config::CacheBackendKind;
    use web_analyzer::Config;

    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/widgets"))
            .times(1)
            .respond_with(
                status_code(200)
                    .append_header("Content-Type", "text/html; charset=utf-8")
                    .body(sample_html()),
            ),
    );

    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = Config {
        db_path: dir.path().join("analyses.db"),
        cache_backend: CacheBackendKind::Sqlite,
        ..Default::default()
    };
    let analyzer = Analyzer::from_config(&config).await.expect("analyzer");
    let url = server.url_str("/widgets");

    let first = analyzer
        .analyze(&url, &AnalysisSettings::default())
        .await
        .expect("first");
    assert!(!first.cached);
    let performance = first.record.extraction.performance.expect("performance");
    assert_eq!(performance.encoding, "utf-8");
    assert_eq!(first.record.title, "Widgets and Gadgets for the Modern Workshop");

    let second = analyzer
        .analyze(&url, &AnalysisSettings::default())
        .await
        .expect("second");
    assert!(second.cached, "SQLite cache serves the repeat request");
    assert_eq!(analyzer.store().list(0, 10).await.expect("list").len(), 2);
}
