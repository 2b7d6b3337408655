//! talentdb-embed
//!
//! Embedding strategies behind [`talentdb_core::traits::EmbeddingStrategy`]:
//! a remote REST provider, a local BGE-M3 model run through candle, and a
//! deterministic token-hash embedding. [`select_strategy`] picks the first
//! one that works at startup.

pub mod device;
pub mod hash;
pub mod local;
pub mod pool;
pub mod remote;
pub mod select;
pub mod tokenize;

pub use hash::HashEmbedding;
pub use local::LocalModelEmbedding;
pub use pool::masked_mean_l2;
pub use remote::{RemoteApiEmbedding, RemoteApiGenerator};
pub use select::{first_working, select_strategy, use_fake_embeddings};

use talentdb_core::Error;

pub(crate) fn provider_err<E: std::fmt::Display>(err: E) -> Error {
    Error::EmbeddingProvider(err.to_string())
}
