use std::sync::Arc;

use talentdb_core::config::{EmbeddingSettings, StrategyKind};
use talentdb_core::traits::EmbeddingStrategy;
use talentdb_core::{Error, Result};

use crate::{HashEmbedding, LocalModelEmbedding, RemoteApiEmbedding};

pub type SharedStrategy = Arc<dyn EmbeddingStrategy>;

/// `APP_USE_FAKE_EMBEDDINGS=1|true` pins selection to the hash embedding.
pub fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn kind_name(kind: StrategyKind) -> &'static str {
    match kind {
        StrategyKind::Remote => "remote",
        StrategyKind::Local => "local",
        StrategyKind::Hash => "hash",
    }
}

fn construct(kind: StrategyKind, settings: &EmbeddingSettings) -> Result<SharedStrategy> {
    Ok(match kind {
        StrategyKind::Remote => Arc::new(RemoteApiEmbedding::new(&settings.remote, settings.dimension)?),
        StrategyKind::Local => Arc::new(LocalModelEmbedding::new(&settings.local)?),
        StrategyKind::Hash => Arc::new(HashEmbedding::new(settings.dimension)?),
    })
}

/// Try the configured strategies in priority order. Construction is lazy,
/// so a later candidate is never built when an earlier one works.
pub fn select_strategy(settings: &EmbeddingSettings) -> Result<SharedStrategy> {
    let kinds: Vec<StrategyKind> = if use_fake_embeddings() {
        tracing::info!("APP_USE_FAKE_EMBEDDINGS set; using hash embedding");
        vec![StrategyKind::Hash]
    } else {
        settings.strategies.clone()
    };
    let candidates = kinds
        .into_iter()
        .map(|kind| (kind_name(kind).to_string(), construct(kind, settings)));
    first_working(candidates, &settings.probe_text)
}

/// First candidate that constructed and embeds `probe_text` to a vector of
/// its advertised dimension. The error lists why each candidate failed.
pub fn first_working<I>(candidates: I, probe_text: &str) -> Result<SharedStrategy>
where
    I: IntoIterator<Item = (String, Result<SharedStrategy>)>,
{
    let mut failures = Vec::new();
    for (name, built) in candidates {
        match built.and_then(|s| probe(&s, probe_text).map(|()| s)) {
            Ok(strategy) => {
                let stats = strategy.stats();
                tracing::info!(
                    strategy = %name,
                    model = %stats.model,
                    dim = stats.dimension,
                    "embedding strategy active"
                );
                if !failures.is_empty() {
                    tracing::warn!(skipped = %failures.join("; "), "fell back past failing strategies");
                }
                return Ok(strategy);
            }
            Err(e) => {
                tracing::warn!(strategy = %name, error = %e, "embedding strategy unavailable");
                failures.push(format!("{name}: {e}"));
            }
        }
    }
    if failures.is_empty() {
        failures.push("no strategies configured".into());
    }
    Err(Error::EmbeddingUnavailable(failures.join("; ")))
}

fn probe(strategy: &SharedStrategy, probe_text: &str) -> Result<()> {
    let v = strategy.embed_query(probe_text)?;
    if v.len() != strategy.dim() {
        return Err(Error::EmbeddingUnavailable(format!(
            "probe returned {} values, strategy advertises {}",
            v.len(),
            strategy.dim()
        )));
    }
    Ok(())
}
