use crate::error::Result;
use crate::types::EmbeddingStats;

/// Turns text into vectors.
///
/// Implementations return one row per input text, in input order, and
/// L2-normalize every vector whose dimension is below
/// [`NORMALIZATION_THRESHOLD`].
pub trait EmbeddingStrategy: Send + Sync {
    /// Stable model identifier recorded in persisted descriptors.
    fn model_id(&self) -> &str;
    /// Output dimension (D).
    fn dim(&self) -> usize;
    /// Embed a batch of documents; row `i` belongs to `texts[i]`.
    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    /// Embed one query, in retrieval-query mode when the provider has one.
    fn embed_query(&self, text: &str) -> Result<Vec<f32>>;
    fn stats(&self) -> EmbeddingStats;
}

/// Vectors shorter than this are normalized by the strategy itself.
pub const NORMALIZATION_THRESHOLD: usize = 3072;

/// Free-text generation consumed by the summary layer.
pub trait SummaryGenerator: Send + Sync {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Normalize when the dimension is below [`NORMALIZATION_THRESHOLD`].
pub fn normalize_if_needed(v: &mut [f32]) {
    if v.len() < NORMALIZATION_THRESHOLD {
        l2_normalize(v);
    }
}
