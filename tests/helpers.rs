// Shared test helpers for database setup and fake collaborators.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a different subset

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;

use web_analyzer::cache::{CacheStore, MemoryBackend};
use web_analyzer::enrich::{InsightPayload, LanguageModelClient};
use web_analyzer::error_handling::{EnrichmentError, FetchError, StoreError};
use web_analyzer::fetch::{Fetcher, PageDocument};
use web_analyzer::parse::{ImageInventory, LinkInventory, Metadata};
use web_analyzer::storage::{run_migrations, SqliteStore, Store, StoredAnalysis};
use web_analyzer::{AnalysisRecord, Analyzer};

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A well-formed page: 45-char title, description, one H1, links, and images.
pub fn sample_html() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Widgets and Gadgets for the Modern Workshop</title>
  <meta name="description" content="Everything you need to know about widgets.">
  <link rel="canonical" href="https://shop.example/widgets">
</head>
<body>
  <h1>Widgets</h1>
  <h2>Overview</h2>
  <p>Widgets are small and useful.</p>
  <a href="/about">About us</a>
  <a href="https://other.example/page">Elsewhere</a>
  <img src="/logo.png" alt="Logo">
  <img src="/banner.png">
</body>
</html>"#
        .to_string()
}

/// Fetcher returning canned documents or errors per URL.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<String, FetchError>>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    /// Fails `url` with `error`.
    pub fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(
        &self,
        url: &str,
        _follow_redirects: bool,
        _timeout: Duration,
    ) -> Result<PageDocument, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(PageDocument::from_html(url, body)),
            Some(Err(e)) => Err(e.clone()),
            None => Err(FetchError::Connect {
                url: url.to_string(),
                reason: "no canned response".to_string(),
            }),
        }
    }
}

/// Fetcher that never completes, for timeout tests.
pub struct HangingFetcher;

#[async_trait]
impl Fetcher for HangingFetcher {
    async fn fetch(
        &self,
        _url: &str,
        _follow_redirects: bool,
        _timeout: Duration,
    ) -> Result<PageDocument, FetchError> {
        std::future::pending().await
    }
}

/// Language model returning a fixed result and recording the content it saw.
pub struct FakeLanguageModel {
    result: Result<InsightPayload, EnrichmentError>,
    pub seen_content: Mutex<Vec<String>>,
}

impl FakeLanguageModel {
    pub fn succeeding() -> Self {
        Self {
            result: Ok(InsightPayload {
                success: true,
                analysis: Some(serde_json::json!({"summary": "A page about widgets"})),
                error: None,
                raw_response: r#"{"summary": "A page about widgets"}"#.to_string(),
            }),
            seen_content: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: EnrichmentError) -> Self {
        Self {
            result: Err(error),
            seen_content: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen_content.lock().expect("lock poisoned").len()
    }
}

#[async_trait]
impl LanguageModelClient for FakeLanguageModel {
    fn enabled(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        content: &str,
        _metadata: Option<&Metadata>,
        _links: Option<&LinkInventory>,
        _images: Option<&ImageInventory>,
    ) -> Result<InsightPayload, EnrichmentError> {
        self.seen_content
            .lock()
            .expect("lock poisoned")
            .push(content.to_string());
        self.result.clone()
    }
}

/// Store whose every operation fails.
pub struct FailingStore;

#[async_trait]
impl Store for FailingStore {
    async fn save(&self, _record: &AnalysisRecord) -> Result<i64, StoreError> {
        Err(StoreError::FileCreationError("disk full".to_string()))
    }

    async fn get(&self, id: i64) -> Result<AnalysisRecord, StoreError> {
        Err(StoreError::NotFound(id))
    }

    async fn list(&self, _skip: usize, _limit: usize) -> Result<Vec<StoredAnalysis>, StoreError> {
        Ok(Vec::new())
    }
}

/// In-memory cache with a one-hour TTL.
pub fn memory_cache() -> Arc<CacheStore> {
    Arc::new(CacheStore::new(
        Arc::new(MemoryBackend::new()),
        Duration::from_secs(3600),
    ))
}

/// Analyzer over `fetcher` and `llm` with an in-memory store and cache.
pub async fn analyzer_with(
    fetcher: Arc<dyn Fetcher>,
    llm: Arc<dyn LanguageModelClient>,
) -> (Analyzer, SqliteStore) {
    let store = SqliteStore::new(create_test_pool().await);
    let analyzer = Analyzer::new(fetcher, llm, Arc::new(store.clone()), memory_cache());
    (analyzer, store)
}

/// Fetcher that panics, for task-abort tests.
pub struct PanickingFetcher;

#[async_trait]
impl Fetcher for PanickingFetcher {
    async fn fetch(
        &self,
        url: &str,
        _follow_redirects: bool,
        _timeout: Duration,
    ) -> Result<PageDocument, FetchError> {
        panic!("fetcher blew up on {url}");
    }
}
