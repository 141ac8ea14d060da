//! Single-URL analysis pipeline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use log::{debug, error, info, warn};

use super::record::{AnalysisRecord, RecordStats};
use super::settings::AnalysisSettings;
use crate::cache::{
    derive_cache_key, CacheBackend, CacheLookup, CacheStore, MemoryBackend, SqliteCacheBackend,
};
use crate::config::{CacheBackendKind, Config, AI_CONTENT_PREVIEW_CHARS};
use crate::enrich::{DisabledLanguageModel, Enrichment, LanguageModelClient, OpenAiClient};
use crate::error_handling::{
    AnalysisError, ErrorType, InfoType, InitializationError, ParseError, ProcessingStats, WarningType,
};
use crate::fetch::{Fetcher, HttpFetcher, PageDocument};
use crate::parse::{
    extract_content, extract_headings, extract_images, extract_links, extract_metadata,
    extract_performance, parse_document, ExtractionResult,
};
use crate::seo::{score_page, SeoReport};
use crate::storage::{init_db_pool_with_path, run_migrations, SqliteStore, Store};
use crate::utils::sanitize_and_truncate_error_message;

/// Result of one successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// The assembled (or cached) record.
    pub record: AnalysisRecord,
    /// Store identifier, absent when persistence failed.
    pub id: Option<i64>,
    /// Non-fatal problems encountered along the way.
    pub warnings: Vec<String>,
    /// Whether the record came from the cache.
    pub cached: bool,
}

/// Runs the fetch, extract, score, enrich, cache, and persist stages for a URL.
///
/// All collaborators are injected. An `Analyzer` is shared across concurrent
/// runs behind an `Arc`; the cache and statistics are the only shared state.
pub struct Analyzer {
    fetcher: Arc<dyn Fetcher>,
    llm: Arc<dyn LanguageModelClient>,
    store: Arc<dyn Store>,
    cache: Arc<CacheStore>,
    stats: Arc<ProcessingStats>,
    fetch_timeout: Duration,
    cache_ttl: Option<Duration>,
}

/// Extraction outputs computed while the document is alive.
struct Extracted {
    extraction: ExtractionResult,
    seo: Option<SeoReport>,
    ai_text: Option<String>,
}

impl Analyzer {
    /// Creates an analyzer from its collaborators.
    ///
    /// Uses the default fetch timeout, fresh statistics, and the cache store's
    /// default TTL.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        llm: Arc<dyn LanguageModelClient>,
        store: Arc<dyn Store>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            fetcher,
            llm,
            store,
            cache,
            stats: Arc::new(ProcessingStats::new()),
            fetch_timeout: Duration::from_secs(crate::config::DEFAULT_FETCH_TIMEOUT_SECS),
            cache_ttl: None,
        }
    }

    /// Records statistics into `stats` instead of a private tracker.
    pub fn with_stats(mut self, stats: Arc<ProcessingStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Sets the per-request fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Sets the TTL for cache writes.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Builds the production analyzer: SQLite store, HTTP fetcher, configured
    /// cache backend, and an OpenAI client when a key is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated, or if
    /// an HTTP client cannot be built.
    pub async fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let pool = init_db_pool_with_path(&config.db_path).await?;
        run_migrations(&pool).await?;

        let fetcher = HttpFetcher::from_config(config)?;
        let llm: Arc<dyn LanguageModelClient> = match OpenAiClient::from_config(config)? {
            Some(client) => Arc::new(client),
            None => {
                info!("No language model API key configured; AI analysis disabled");
                Arc::new(DisabledLanguageModel)
            }
        };

        let backend: Arc<dyn CacheBackend> = match config.cache_backend {
            CacheBackendKind::Memory => Arc::new(MemoryBackend::new()),
            CacheBackendKind::Sqlite => Arc::new(SqliteCacheBackend::new(pool.clone())),
        };
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let cache = Arc::new(CacheStore::new(backend, ttl));

        Ok(Self::new(
            Arc::new(fetcher),
            llm,
            Arc::new(SqliteStore::new(pool)),
            cache,
        )
        .with_fetch_timeout(Duration::from_secs(config.timeout_seconds))
        .with_cache_ttl(ttl))
    }

    /// Statistics recorded by this analyzer.
    pub fn stats(&self) -> &Arc<ProcessingStats> {
        &self.stats
    }

    /// The cache this analyzer reads and writes.
    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// The store this analyzer persists into.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Analyzes `url` with `settings`.
    ///
    /// A live cache entry for the same (URL, settings) fingerprint is returned
    /// without fetching. Otherwise the page is fetched, extracted, optionally
    /// scored and enriched, cached, and persisted.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Fetch` or `AnalysisError::Parse`. Enrichment,
    /// cache, and persistence failures are reported as warnings on the outcome.
    pub async fn analyze(
        &self,
        url: &str,
        settings: &AnalysisSettings,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let start = Instant::now();
        let key = derive_cache_key(url, settings);
        let mut warnings = Vec::new();

        if let Some(record) = self.cached_record(&key).await {
            info!("Cache hit for {url}");
            let id = self.persist(&record, &mut warnings).await;
            return Ok(AnalysisOutcome {
                record,
                id,
                warnings,
                cached: true,
            });
        }

        debug!("Fetching {url}");
        let page = self
            .fetcher
            .fetch(url, settings.follow_redirects, self.fetch_timeout)
            .await
            .map_err(|e| {
                self.stats.increment_error(e.error_type());
                error!("Failed to fetch {url}: {e}");
                AnalysisError::from(e)
            })?;
        if page.redirect_count > 0 {
            self.stats.increment_info(InfoType::HttpRedirect);
        }

        let extracted = self.extract(&page, settings).map_err(|e| {
            self.stats.increment_error(ErrorType::DocumentParseError);
            error!("Failed to parse {url}: {e}");
            AnalysisError::from(e)
        })?;
        let Extracted {
            extraction,
            seo,
            ai_text,
        } = extracted;

        let ai_analysis = if settings.include_ai_analysis && self.llm.enabled() {
            debug!("Requesting AI analysis for {url}");
            let text = ai_text.as_deref().unwrap_or_default();
            match self
                .llm
                .analyze(
                    text,
                    extraction.metadata.as_ref(),
                    extraction.links.as_ref(),
                    extraction.images.as_ref(),
                )
                .await
            {
                Ok(payload) => Some(Enrichment::Completed(payload)),
                Err(e) => {
                    warn!("AI analysis failed for {url}: {e}");
                    self.stats.increment_warning(WarningType::EnrichmentFailed);
                    warnings.push(sanitize_and_truncate_error_message(&e.to_string()));
                    Some(Enrichment::failed(&e))
                }
            }
        } else {
            if settings.include_ai_analysis {
                self.stats.increment_info(InfoType::EnrichmentSkipped);
            }
            None
        };

        let record = assemble(url, &page, settings, extraction, seo, ai_analysis, start);

        match serde_json::to_value(&record) {
            Ok(payload) => {
                if self.cache.set(&key, &payload, self.cache_ttl).await {
                    info!("Cached analysis of {url}");
                } else {
                    self.stats.increment_warning(WarningType::CacheWriteFailed);
                }
            }
            Err(e) => {
                warn!("Failed to encode analysis of {url} for caching: {e}");
                self.stats.increment_warning(WarningType::CacheWriteFailed);
            }
        }

        let id = self.persist(&record, &mut warnings).await;
        Ok(AnalysisOutcome {
            record,
            id,
            warnings,
            cached: false,
        })
    }

    /// Returns the cached record for `key`, counting the lookup outcome.
    async fn cached_record(&self, key: &str) -> Option<AnalysisRecord> {
        let payload = match self.cache.lookup(key).await {
            CacheLookup::Hit(payload) => payload,
            CacheLookup::Miss => {
                self.stats.increment_info(InfoType::CacheMiss);
                return None;
            }
            CacheLookup::Expired => {
                self.stats.increment_info(InfoType::CacheExpired);
                return None;
            }
            CacheLookup::Unavailable => {
                self.stats.increment_warning(WarningType::CacheReadFailed);
                return None;
            }
        };

        match serde_json::from_value(payload) {
            Ok(record) => {
                self.stats.increment_info(InfoType::CacheHit);
                Some(record)
            }
            Err(e) => {
                warn!("Ignoring cached payload for {key} that is not an analysis: {e}");
                self.stats.increment_warning(WarningType::CacheReadFailed);
                None
            }
        }
    }

    async fn persist(&self, record: &AnalysisRecord, warnings: &mut Vec<String>) -> Option<i64> {
        match self.store.save(record).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("Failed to persist analysis of {}: {e}", record.url);
                self.stats.increment_warning(WarningType::PersistFailed);
                warnings.push(format!(
                    "Failed to persist analysis: {}",
                    sanitize_and_truncate_error_message(&e.to_string())
                ));
                None
            }
        }
    }

    /// Parses the page and runs the enabled extractors and the scorer.
    ///
    /// Synchronous so the non-`Send` document never lives across an await.
    fn extract(
        &self,
        page: &PageDocument,
        settings: &AnalysisSettings,
    ) -> Result<Extracted, ParseError> {
        let parsed = parse_document(&page.body, &page.base_url)?;
        let document = &parsed.document;
        let mut extraction = ExtractionResult::default();

        if settings.include_metadata {
            let metadata = extract_metadata(document, settings.include_meta_tags);
            if metadata.title.trim().is_empty() {
                self.stats.increment_warning(WarningType::MissingTitle);
            }
            if metadata
                .description
                .as_deref()
                .map_or(true, |d| d.trim().is_empty())
            {
                self.stats.increment_warning(WarningType::MissingMetaDescription);
            }
            extraction.metadata = Some(metadata);
        }
        if settings.include_links {
            extraction.links = Some(extract_links(document, &parsed.base, settings.max_links));
        }
        if settings.include_images {
            extraction.images = Some(extract_images(document, &parsed.base));
        }
        if settings.include_content {
            extraction.content = Some(extract_content(document, settings.max_content_length));
        }
        if settings.include_headings {
            extraction.headings = Some(extract_headings(document));
        }
        if settings.include_performance {
            extraction.performance = Some(extract_performance(page));
        }

        let seo = match (
            settings.include_seo_analysis,
            &extraction.metadata,
            &extraction.content,
        ) {
            (true, Some(metadata), Some(content)) => Some(score_page(
                metadata,
                content,
                extraction.headings.as_ref(),
                extraction.images.as_ref(),
                extraction.links.as_ref(),
            )),
            _ => None,
        };

        // Enrichment reads page text even when the content stage is off. One
        // character past the preview lets the prompt mark the cut.
        let ai_text = if settings.include_ai_analysis {
            Some(match &extraction.content {
                Some(content) => content.text.clone(),
                None => extract_content(document, AI_CONTENT_PREVIEW_CHARS + 1).text,
            })
        } else {
            None
        };

        Ok(Extracted {
            extraction,
            seo,
            ai_text,
        })
    }
}

fn assemble(
    url: &str,
    page: &PageDocument,
    settings: &AnalysisSettings,
    extraction: ExtractionResult,
    seo_analysis: Option<SeoReport>,
    ai_analysis: Option<Enrichment>,
    start: Instant,
) -> AnalysisRecord {
    let stats = RecordStats {
        processing_time: start.elapsed().as_secs_f64(),
        content_length: extraction.content.as_ref().map_or(0, |c| c.length),
        links_count: extraction.links.as_ref().map_or(0, |l| l.total),
        images_count: extraction.images.as_ref().map_or(0, |i| i.total),
    };
    let title = extraction
        .metadata
        .as_ref()
        .map(|m| m.title.clone())
        .unwrap_or_default();

    AnalysisRecord {
        url: url.to_string(),
        final_url: page.final_url.clone(),
        status_code: page.status_code,
        title,
        timestamp: Utc::now(),
        headers: settings.include_headers.then(|| page.headers.clone()),
        settings: settings.clone(),
        extraction,
        seo_analysis,
        ai_analysis,
        stats,
    }
}
