use thiserror::Error;

/// Failure kinds surfaced by the retrieval core.
///
/// Only `EmbeddingProvider` is meant to reach a caller of a single query;
/// the persistence and cache variants are logged and absorbed by the
/// component that raised them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("No embedding strategy available: {0}")]
    EmbeddingUnavailable(String),

    #[error("Embedding provider failed: {0}")]
    EmbeddingProvider(String),

    #[error("Index persistence failed: {0}")]
    IndexPersistence(String),

    #[error("Cache backend unavailable: {0}")]
    CacheBackend(String),

    #[error("Malformed cache entry: {0}")]
    MalformedCacheEntry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
