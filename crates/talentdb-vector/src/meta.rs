//! Sidecar descriptors written next to the persisted matrix and index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use talentdb_core::types::Metric;

/// Describes a persisted embedding matrix. Reusable only when model,
/// dimension and fingerprint all match the current build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingCacheMeta {
    pub embedding_model: String,
    pub dimension: usize,
    pub dataset_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

impl EmbeddingCacheMeta {
    pub fn matches(&self, model: &str, dimension: usize, fingerprint: &str) -> bool {
        self.embedding_model == model
            && self.dimension == dimension
            && self.dataset_fingerprint == fingerprint
    }
}

/// Describes a persisted flat index and the live index state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorIndexMeta {
    pub embedding_model: String,
    pub dimension: usize,
    pub dataset_fingerprint: String,
    pub metric: Metric,
    pub row_count: usize,
}
