//! talentdb-vector
//!
//! Holds the employee embedding matrix and answers nearest-neighbour queries,
//! through a flat index when enabled and brute force otherwise. Embeddings and
//! the index are persisted with sidecar descriptors and reused only while
//! model, dimension, dataset fingerprint (and for the index, metric and row
//! count) still match.

pub mod flat;
pub mod index;
pub mod matrix;
pub mod meta;
pub mod search;
pub mod store;

pub use flat::FlatIndex;
pub use index::{IndexOptions, IndexState, IndexStats, VectorIndex};
pub use meta::{EmbeddingCacheMeta, VectorIndexMeta};
pub use search::brute_force_search;
