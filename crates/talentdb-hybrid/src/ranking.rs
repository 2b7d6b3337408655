use std::sync::Arc;
use std::time::Instant;

use talentdb_core::traits::EmbeddingStrategy;
use talentdb_core::types::{Employee, ProcessedQuery, SearchResult};
use talentdb_core::Result;
use talentdb_query::QueryProcessor;
use talentdb_vector::{IndexState, VectorIndex};

use crate::scoring::{assess, confidence, match_reasons};

/// Hits fetched per requested result, leaving room for re-ranking.
pub const OVERFETCH: usize = 2;

/// Vector retrieval followed by heuristic re-ranking.
pub struct RankingEngine {
    processor: QueryProcessor,
    strategy: Arc<dyn EmbeddingStrategy>,
    index: Arc<VectorIndex>,
}

impl RankingEngine {
    pub fn new(strategy: Arc<dyn EmbeddingStrategy>, index: Arc<VectorIndex>) -> Self {
        Self { processor: QueryProcessor::new(), strategy, index }
    }

    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }

    pub fn strategy(&self) -> &Arc<dyn EmbeddingStrategy> {
        &self.strategy
    }

    /// At most `top_k` results, best first. Fails only when the query cannot
    /// be embedded.
    pub fn rank(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        self.rank_in(&self.index.snapshot(), query, top_k)
    }

    /// Rank against one fixed index generation.
    pub fn rank_in(&self, state: &IndexState, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let processed = self.processor.process(query);
        let composite = composite_query(&processed);
        let vector = self.strategy.embed_query(&composite)?;
        let hits = state.search(&vector, top_k.saturating_mul(OVERFETCH))?;

        let mut scored: Vec<_> = hits
            .into_iter()
            .map(|(row, similarity)| {
                let employee = &state.employees[row];
                (employee, assess(employee, &processed, similarity))
            })
            .collect();
        // Stable: equal scores keep similarity order.
        scored.sort_by(|a, b| b.1.score.total_cmp(&a.1.score));
        scored.truncate(top_k);

        tracing::debug!(
            query = %processed.cleaned,
            composite = %composite,
            results = scored.len(),
            ms = start.elapsed().as_millis() as u64,
            "ranked candidates"
        );

        Ok(scored
            .into_iter()
            .map(|(employee, assessment)| SearchResult {
                employee: employee.clone(),
                relevance_score: assessment.score,
                match_reasons: match_reasons(employee, &assessment),
                confidence: confidence(&processed, &assessment),
            })
            .collect())
    }

    /// Plain nearest neighbours of the raw query text, no heuristics.
    pub fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<(Employee, f32)>> {
        let state = self.index.snapshot();
        let vector = self.strategy.embed_query(query)?;
        Ok(state
            .search(&vector, k)?
            .into_iter()
            .map(|(row, similarity)| (state.employees[row].clone(), similarity))
            .collect())
    }
}

/// The text actually embedded for a query: the cleaned query plus clauses
/// spelling out skills, domains and minimum experience.
pub fn composite_query(query: &ProcessedQuery) -> String {
    let mut parts = vec![query.cleaned.clone()];
    if !query.skill_terms.is_empty() {
        let skills: Vec<&str> = query.skill_terms.iter().map(String::as_str).collect();
        parts.push(format!("Required skills: {}", skills.join(", ")));
    }
    if !query.domain_context.is_empty() {
        parts.push(format!("Domain experience: {}", query.domain_context.join(", ")));
    }
    if let Some(min) = query.experience_requirements.min_years {
        parts.push(format!("Minimum {min} years experience"));
    }
    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_appends_structured_clauses() {
        let q = QueryProcessor::new().process("Senior Python dev in healthcare");
        assert_eq!(
            composite_query(&q),
            "senior python developer in healthcare | Required skills: python | \
             Domain experience: healthcare | Minimum 5 years experience"
        );
    }

    #[test]
    fn composite_of_plain_text_is_the_cleaned_text() {
        let q = QueryProcessor::new().process("Someone   friendly");
        assert_eq!(composite_query(&q), "someone friendly");
    }
}
