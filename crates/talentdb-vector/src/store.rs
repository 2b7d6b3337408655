//! On-disk caches for the embedding matrix and the flat index.
//!
//! Every load checks the sidecar descriptor against the current build; any
//! mismatch or read failure is a miss. Saves drop the old descriptor before
//! touching the data file and write the new one last, so a save that fails
//! halfway leaves no descriptor at all. Save failures are returned so the
//! caller can log them and carry on with the in-memory result.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use talentdb_core::config::IndexSettings;
use talentdb_core::Result;

use crate::flat::FlatIndex;
use crate::matrix::{persistence, read_matrix, write_atomic, write_matrix};
use crate::meta::{EmbeddingCacheMeta, VectorIndexMeta};

#[derive(Debug, Clone)]
pub struct IndexStore {
    embedding_file: PathBuf,
    embedding_meta_file: PathBuf,
    index_file: PathBuf,
    index_meta_file: PathBuf,
}

impl IndexStore {
    pub fn new(dir: &Path, settings: &IndexSettings) -> Self {
        Self {
            embedding_file: dir.join(&settings.embedding_file),
            embedding_meta_file: dir.join(&settings.embedding_meta_file),
            index_file: dir.join(&settings.index_file),
            index_meta_file: dir.join(&settings.index_meta_file),
        }
    }

    pub fn load_embeddings(&self, model: &str, dimension: usize, fingerprint: &str, rows: usize) -> Option<Vec<Vec<f32>>> {
        let meta: EmbeddingCacheMeta = read_json(&self.embedding_meta_file)?;
        if !meta.matches(model, dimension, fingerprint) {
            tracing::info!(
                cached_model = %meta.embedding_model,
                cached_fingerprint = %meta.dataset_fingerprint,
                "embedding cache is stale"
            );
            return None;
        }
        match read_matrix(&self.embedding_file) {
            Ok(m) if m.len() == rows && m.iter().all(|r| r.len() == dimension) => Some(m),
            Ok(m) => {
                tracing::warn!(found = m.len(), expected = rows, "embedding cache shape mismatch");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "embedding cache unreadable");
                None
            }
        }
    }

    pub fn save_embeddings(&self, model: &str, dimension: usize, fingerprint: &str, rows: &[Vec<f32>]) -> Result<()> {
        remove_descriptor(&self.embedding_meta_file)?;
        write_matrix(&self.embedding_file, rows)?;
        let meta = EmbeddingCacheMeta {
            embedding_model: model.to_string(),
            dimension,
            dataset_fingerprint: fingerprint.to_string(),
            created_at: Utc::now(),
        };
        write_json(&self.embedding_meta_file, &meta)
    }

    pub fn load_index(&self, expected: &VectorIndexMeta) -> Option<FlatIndex> {
        let meta: VectorIndexMeta = read_json(&self.index_meta_file)?;
        if &meta != expected {
            tracing::info!(?meta, "flat index descriptor does not match; rebuilding");
            return None;
        }
        match FlatIndex::load(&self.index_file, expected.metric) {
            Ok(index) if index.len() == expected.row_count && (index.dim() == expected.dimension || index.is_empty()) => Some(index),
            Ok(_) => {
                tracing::warn!("flat index file disagrees with its descriptor");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "flat index unreadable");
                None
            }
        }
    }

    pub fn save_index(&self, index: &FlatIndex, meta: &VectorIndexMeta) -> Result<()> {
        remove_descriptor(&self.index_meta_file)?;
        index.save(&self.index_file)?;
        write_json(&self.index_meta_file, meta)
    }
}

fn remove_descriptor(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(persistence(path, e)),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable descriptor");
            None
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_vec_pretty(value).map_err(|e| persistence(path, e))?;
    write_atomic(path, &raw)
}
