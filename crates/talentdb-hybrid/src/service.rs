use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use talentdb_cache::{get_json, open_cache, query_cache_key, set_json, ResultCache};
use talentdb_core::config::Settings;
use talentdb_core::traits::EmbeddingStrategy;
use talentdb_core::types::{EmbeddingStats, Employee, SearchResult};
use talentdb_core::{Error, Result};
use talentdb_embed::select_strategy;
use talentdb_vector::{IndexOptions, IndexStats, VectorIndex};

use crate::ranking::RankingEngine;

pub const QUERY_CACHE_PREFIX: &str = "rag:query";

/// Answer to a search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SearchOutcome {
    Ranked(Vec<SearchResult>),
    /// The service never became active; carries the reason.
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub active: bool,
    pub inactive_reason: Option<String>,
    pub embedding: Option<EmbeddingStats>,
    pub index: Option<IndexStats>,
    pub cache_backend: &'static str,
    pub cache_size: Option<usize>,
}

/// Startup wiring plus cached search. Construction never fails; when no
/// embedding strategy works (or the first index build fails) the service
/// stays inactive and every search answers [`SearchOutcome::Unavailable`].
pub struct SearchService {
    settings: Settings,
    engine: Option<RankingEngine>,
    inactive_reason: Option<String>,
    cache: Arc<dyn ResultCache>,
}

impl SearchService {
    /// Select a strategy from `settings`, then wire everything else.
    pub fn start(settings: &Settings, employees: Vec<Employee>) -> Self {
        Self::start_with(settings, select_strategy(&settings.embedding), employees)
    }

    /// Wire the service around an already selected (or failed) strategy.
    pub fn start_with(
        settings: &Settings,
        strategy: Result<Arc<dyn EmbeddingStrategy>>,
        employees: Vec<Employee>,
    ) -> Self {
        let cache = open_cache(&settings.cache, QUERY_CACHE_PREFIX);
        let engine = strategy.and_then(|strategy| {
            let options = IndexOptions::from_settings(settings);
            let index = VectorIndex::build(Arc::clone(&strategy), employees, options)?;
            Ok(RankingEngine::new(strategy, Arc::new(index)))
        });

        match engine {
            Ok(engine) => {
                tracing::info!(rows = engine.index().len(), cache = cache.backend(), "search service active");
                Self { settings: settings.clone(), engine: Some(engine), inactive_reason: None, cache }
            }
            Err(e) => {
                tracing::error!(error = %e, "search service inactive");
                Self {
                    settings: settings.clone(),
                    engine: None,
                    inactive_reason: Some(e.to_string()),
                    cache,
                }
            }
        }
    }

    /// Replace the result cache, e.g. with one sharing a clock with a test.
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&RankingEngine> {
        self.engine.as_ref()
    }

    pub fn status(&self) -> ServiceStatus {
        ServiceStatus {
            active: self.is_active(),
            inactive_reason: self.inactive_reason.clone(),
            embedding: self.engine.as_ref().map(|e| e.strategy().stats()),
            index: self.engine.as_ref().map(|e| e.index().stats()),
            cache_backend: self.cache.backend(),
            cache_size: self.cache.size(),
        }
    }

    /// Ranked, cached search. `top_k` defaults and is clamped per
    /// `search` settings. Only a failing embed call is an `Err`.
    pub fn search(&self, query: &str, top_k: Option<usize>) -> Result<SearchOutcome> {
        let Some(engine) = &self.engine else {
            return Ok(SearchOutcome::Unavailable(self.unavailable_reason()));
        };
        let search = &self.settings.search;
        let top_k = search.clamp_top_k(top_k.unwrap_or(search.default_top_k));

        let state = engine.index().snapshot();
        let key = query_cache_key(query, top_k, &state.meta.dataset_fingerprint);
        if let Some(results) = get_json::<Vec<SearchResult>>(self.cache.as_ref(), &key) {
            tracing::debug!(key = %key, "query cache hit");
            return Ok(SearchOutcome::Ranked(results));
        }

        let results = engine.rank_in(&state, query, top_k)?;
        let ttl = Duration::from_secs(self.settings.cache.query_ttl_secs);
        set_json(self.cache.as_ref(), &key, &results, ttl);
        Ok(SearchOutcome::Ranked(results))
    }

    /// Rebuild the index for `employees` and swap it in. Cached rankings
    /// for the old data stop matching because the fingerprint changes.
    pub fn reload(&self, employees: Vec<Employee>) -> Result<()> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| Error::EmbeddingUnavailable(self.unavailable_reason()))?;
        engine.index().rebuild(employees)
    }

    pub fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<(Employee, f32)>> {
        let engine = self
            .engine
            .as_ref()
            .ok_or_else(|| Error::EmbeddingUnavailable(self.unavailable_reason()))?;
        engine.semantic_search(query, k)
    }

    fn unavailable_reason(&self) -> String {
        self.inactive_reason.clone().unwrap_or_else(|| "search service is not initialized".into())
    }
}
