use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::RwLock;
use serde::Serialize;

use talentdb_core::config::{expand_path, IndexSettings, Settings};
use talentdb_core::fingerprint::dataset_fingerprint;
use talentdb_core::profile::profile_text;
use talentdb_core::traits::EmbeddingStrategy;
use talentdb_core::types::{Employee, Metric};
use talentdb_core::{Error, Result};

use crate::flat::FlatIndex;
use crate::meta::VectorIndexMeta;
use crate::search::brute_force_search;
use crate::store::IndexStore;

/// Build knobs, usually derived from [`Settings`].
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Where persisted caches live; `None` keeps everything in memory.
    pub cache_dir: Option<PathBuf>,
    pub index: IndexSettings,
    pub batch_size: usize,
    pub show_progress: bool,
}

impl IndexOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let dir = settings.data.cache_dir.trim();
        Self {
            cache_dir: (!dir.is_empty()).then(|| expand_path(dir)),
            index: settings.index.clone(),
            batch_size: settings.embedding.batch_size,
            show_progress: settings.embedding.show_progress,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            cache_dir: None,
            index: IndexSettings::default(),
            batch_size: 32,
            show_progress: false,
        }
    }
}

/// One immutable generation of the index. Searches hold an `Arc` to it,
/// so a concurrent rebuild never changes what they see.
#[derive(Debug)]
pub struct IndexState {
    pub employees: Vec<Employee>,
    /// Row `i` embeds `employees[i]`.
    pub embeddings: Vec<Vec<f32>>,
    pub flat: Option<FlatIndex>,
    pub meta: VectorIndexMeta,
    pub embeddings_from_cache: bool,
    pub index_from_cache: bool,
}

impl IndexState {
    /// `(row, similarity)` pairs, best first; ties keep storage order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        if query.len() != self.meta.dimension {
            return Err(Error::EmbeddingProvider(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.meta.dimension
            )));
        }
        if k == 0 || self.employees.is_empty() {
            return Ok(Vec::new());
        }
        Ok(match &self.flat {
            Some(flat) => flat.search(query, k),
            None => brute_force_search(&self.embeddings, query, k, self.meta.metric),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStats {
    pub rows: usize,
    pub dimension: usize,
    pub model: String,
    pub metric: Metric,
    pub dataset_fingerprint: String,
    pub flat_index_active: bool,
    pub embeddings_from_cache: bool,
    pub index_from_cache: bool,
}

pub struct VectorIndex {
    strategy: Arc<dyn EmbeddingStrategy>,
    options: IndexOptions,
    store: Option<IndexStore>,
    state: RwLock<Arc<IndexState>>,
}

impl VectorIndex {
    /// Run the full build protocol once. Fails only when the employees
    /// cannot be embedded.
    pub fn build(strategy: Arc<dyn EmbeddingStrategy>, employees: Vec<Employee>, options: IndexOptions) -> Result<Self> {
        let store = options.cache_dir.as_deref().map(|dir| IndexStore::new(dir, &options.index));
        let state = build_state(strategy.as_ref(), store.as_ref(), &options, employees)?;
        Ok(Self { strategy, options, store, state: RwLock::new(Arc::new(state)) })
    }

    /// Build a new generation for `employees` and swap it in. On error the
    /// current generation stays live.
    pub fn rebuild(&self, employees: Vec<Employee>) -> Result<()> {
        let next = build_state(self.strategy.as_ref(), self.store.as_ref(), &self.options, employees)?;
        let rows = next.employees.len();
        *self.state.write() = Arc::new(next);
        tracing::info!(rows, "vector index swapped");
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<IndexState> {
        Arc::clone(&self.state.read())
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        self.snapshot().search(query, k)
    }

    pub fn strategy(&self) -> &Arc<dyn EmbeddingStrategy> {
        &self.strategy
    }

    pub fn len(&self) -> usize {
        self.snapshot().employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.snapshot();
        IndexStats {
            rows: state.meta.row_count,
            dimension: state.meta.dimension,
            model: state.meta.embedding_model.clone(),
            metric: state.meta.metric,
            dataset_fingerprint: state.meta.dataset_fingerprint.clone(),
            flat_index_active: state.flat.is_some(),
            embeddings_from_cache: state.embeddings_from_cache,
            index_from_cache: state.index_from_cache,
        }
    }
}

fn build_state(
    strategy: &dyn EmbeddingStrategy,
    store: Option<&IndexStore>,
    options: &IndexOptions,
    employees: Vec<Employee>,
) -> Result<IndexState> {
    let start = Instant::now();
    let fingerprint = dataset_fingerprint(&employees);
    let model = strategy.model_id().to_string();
    let dim = strategy.dim();
    let rows = employees.len();

    let cache = store.filter(|_| options.index.embedding_cache_enabled);
    let cached = cache.and_then(|s| s.load_embeddings(&model, dim, &fingerprint, rows));
    let embeddings_from_cache = cached.is_some();
    let embeddings = match cached {
        Some(m) => {
            tracing::info!(rows, "loaded cached embeddings");
            m
        }
        None => {
            let m = embed_all(strategy, &employees, options)?;
            if let Some(s) = cache {
                if let Err(e) = s.save_embeddings(&model, dim, &fingerprint, &m) {
                    tracing::warn!(error = %e, "could not persist embeddings");
                }
            }
            m
        }
    };

    let meta = VectorIndexMeta {
        embedding_model: model,
        dimension: dim,
        dataset_fingerprint: fingerprint,
        metric: options.index.metric,
        row_count: rows,
    };

    let mut index_from_cache = false;
    let flat = if options.index.enabled {
        match store.and_then(|s| s.load_index(&meta)) {
            Some(index) => {
                index_from_cache = true;
                Some(index)
            }
            None => match FlatIndex::build(&embeddings, meta.metric) {
                Ok(index) => {
                    if let Some(s) = store {
                        if let Err(e) = s.save_index(&index, &meta) {
                            tracing::warn!(error = %e, "could not persist flat index");
                        }
                    }
                    Some(index)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "flat index build failed; using brute force");
                    None
                }
            },
        }
    } else {
        None
    };

    tracing::info!(
        rows,
        dim,
        metric = %meta.metric,
        flat = flat.is_some(),
        embeddings_from_cache,
        index_from_cache,
        ms = start.elapsed().as_millis() as u64,
        "vector index ready"
    );

    Ok(IndexState { employees, embeddings, flat, meta, embeddings_from_cache, index_from_cache })
}

fn embed_all(strategy: &dyn EmbeddingStrategy, employees: &[Employee], options: &IndexOptions) -> Result<Vec<Vec<f32>>> {
    let texts: Vec<String> = employees.iter().map(profile_text).collect();
    let pb = if options.show_progress {
        let pb = ProgressBar::new(texts.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} employees ({percent}%)")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut out = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(options.batch_size.max(1)) {
        let rows = strategy.embed_documents(chunk)?;
        if rows.len() != chunk.len() {
            return Err(Error::EmbeddingProvider(format!(
                "{} texts produced {} embeddings",
                chunk.len(),
                rows.len()
            )));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != strategy.dim()) {
            return Err(Error::EmbeddingProvider(format!(
                "embedding has {} dimensions, strategy advertises {}",
                bad.len(),
                strategy.dim()
            )));
        }
        out.extend(rows);
        pb.set_position(out.len() as u64);
    }
    pb.finish_and_clear();
    tracing::debug!(rows = out.len(), model = strategy.model_id(), "embedded employees");
    Ok(out)
}
