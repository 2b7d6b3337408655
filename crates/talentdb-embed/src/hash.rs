use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use talentdb_core::traits::{l2_normalize, EmbeddingStrategy};
use talentdb_core::types::EmbeddingStats;
use talentdb_core::{Error, Result};

/// Bag-of-tokens embedding: each lowercase alphanumeric token lands in an
/// xxHash64 bucket with a positive weight, then the vector is normalized.
/// Needs no network or weights; identical text always gives identical vectors.
pub struct HashEmbedding {
    dim: usize,
    model_id: String,
}

impl HashEmbedding {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::EmbeddingUnavailable("hash embedding needs dimension >= 1".into()));
        }
        Ok(Self { dim, model_id: format!("hash-xxh64-{dim}") })
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let weight = 0.5 + ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += weight;
        }
        // Always unit length, whatever the dimension.
        l2_normalize(&mut v);
        v
    }
}

impl EmbeddingStrategy for HashEmbedding {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn stats(&self) -> EmbeddingStats {
        EmbeddingStats {
            model: self.model_id.clone(),
            dimension: self.dim,
            provider: "hash".into(),
            query_mode: false,
            normalized: true,
        }
    }
}
