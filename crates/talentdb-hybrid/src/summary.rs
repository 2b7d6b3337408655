//! Narrative summary of a ranked shortlist.
//!
//! The generator is optional. Without one, or when it fails, the summary is
//! a deterministic listing built from the results themselves. Only generated
//! text is cached, so a provider outage is retried on the next request.

use std::sync::Arc;
use std::time::Duration;

use talentdb_cache::{open_cache, summary_cache_key, ResultCache};
use talentdb_core::config::Settings;
use talentdb_core::traits::SummaryGenerator;
use talentdb_core::types::SearchResult;
use talentdb_embed::RemoteApiGenerator;

pub const SUMMARY_CACHE_PREFIX: &str = "ai:summary";
pub const MAX_TOKENS: u32 = 800;
pub const TEMPERATURE: f32 = 0.7;

const MAX_SKILLS: usize = 12;
const MAX_PROJECTS: usize = 6;
const MAX_REASONS: usize = 5;

pub const SYSTEM_PROMPT: &str = "You are an expert HR consultant. Your responses should be \
conversational, specific about why each candidate fits the role, highlight unique strengths, \
and end with a helpful next step. Format your response as a cohesive narrative.";

pub const NO_CANDIDATES_MESSAGE: &str = "I wasn't able to find candidates that closely match \
your requirements.\n\nSuggestions:\n\
- Try broader search terms (e.g., 'developer' instead of 'senior full-stack developer').\n\
- Look for related skills (e.g., 'JavaScript' instead of 'React').\n\
- Adjust experience requirements.";

pub struct Summarizer {
    generator: Option<Arc<dyn SummaryGenerator>>,
    cache: Arc<dyn ResultCache>,
    ttl: Duration,
}

impl Summarizer {
    pub fn new(generator: Option<Arc<dyn SummaryGenerator>>, cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        Self { generator, cache, ttl }
    }

    /// Remote generator when its API key is present, summary cache per
    /// `cache` settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let generator: Option<Arc<dyn SummaryGenerator>> =
            match RemoteApiGenerator::new(&settings.embedding.remote) {
                Ok(g) => Some(Arc::new(g)),
                Err(e) => {
                    tracing::info!(error = %e, "summary generator unavailable; using listing fallback");
                    None
                }
            };
        let cache = open_cache(&settings.cache, SUMMARY_CACHE_PREFIX);
        Self::new(generator, cache, Duration::from_secs(settings.cache.summary_ttl_secs))
    }

    pub fn summarize(&self, query: &str, results: &[SearchResult]) -> String {
        if results.is_empty() {
            return NO_CANDIDATES_MESSAGE.to_string();
        }
        let Some(generator) = &self.generator else {
            return fallback_summary(results);
        };

        let ids: Vec<_> = results.iter().map(|r| r.employee.id).collect();
        let key = summary_cache_key(query, &ids);
        if let Some(cached) = self.cache.get(&key).filter(|s| !s.is_empty()) {
            tracing::debug!("summary cache hit");
            return cached;
        }

        match generator.generate(SYSTEM_PROMPT, &user_prompt(query, results), MAX_TOKENS, TEMPERATURE) {
            Ok(text) => {
                self.cache.set(&key, text.clone(), self.ttl);
                text
            }
            Err(e) => {
                tracing::warn!(error = %e, "summary generation failed; using listing fallback");
                fallback_summary(results)
            }
        }
    }
}

pub fn user_prompt(query: &str, results: &[SearchResult]) -> String {
    format!(
        "User Query: \"{query}\"\n\nCandidate Information:\n{}\n\n\
         Please provide a comprehensive summary of the top candidates based on the user's query.",
        candidate_context(results)
    )
}

/// One block per candidate, separated by a blank line.
pub fn candidate_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let e = &r.employee;
            format!(
                "Candidate {}: {}\nExperience: {} years | Match Score: {:.2}\nSkills: {}\nProjects: {}\nWhy they fit: {}",
                i + 1,
                e.name,
                e.experience_years,
                r.relevance_score,
                head(&e.skills, MAX_SKILLS).join(", "),
                head(&e.projects, MAX_PROJECTS).join(", "),
                head(&r.match_reasons, MAX_REASONS).join("; "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn fallback_summary(results: &[SearchResult]) -> String {
    let n = results.len();
    let plural = if n == 1 { "" } else { "s" };
    let mut lines = vec![format!("I've identified {n} candidate{plural} for your requirements:\n")];
    for (i, r) in results.iter().enumerate() {
        let e = &r.employee;
        lines.push(format!(
            "{}. {} - {} years (Score: {:.2})",
            i + 1,
            e.name,
            e.experience_years,
            r.relevance_score
        ));
        lines.push(format!("   - Skills: {}", head(&e.skills, MAX_SKILLS).join(", ")));
        if !r.match_reasons.is_empty() {
            lines.push(format!("   - Match Reasons: {}", head(&r.match_reasons, MAX_REASONS).join("; ")));
        }
    }
    lines.push("\nWould you like more specific information about any of these candidates?".into());
    lines.join("\n")
}

fn head(items: &[String], n: usize) -> &[String] {
    &items[..items.len().min(n)]
}
