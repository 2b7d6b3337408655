//! talentdb-query
//!
//! Turns free-text hiring queries into [`ProcessedQuery`] features: cleaned
//! text, keywords, skill terms, experience bounds and business domains.
//! Everything here is a pure function of the input text.

pub mod experience;
pub mod text;
pub mod vocab;

use std::collections::BTreeSet;

use talentdb_core::types::ProcessedQuery;

use crate::text::{contains_term, contains_word_prefix};
use crate::vocab::{is_known_skill, is_stopword, synonyms_of, DOMAIN_KEYWORDS, KNOWN_SKILLS, ML_ALIASES};

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryProcessor;

impl QueryProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Never fails; empty or junk input yields empty feature sets.
    pub fn process(&self, text: &str) -> ProcessedQuery {
        let cleaned = text::normalize(text);
        let keywords = keywords(&cleaned);
        let skill_terms = skill_terms(&cleaned, &keywords);
        let experience_requirements = experience::extract(&cleaned);
        let domain_context = domains(&cleaned, &keywords);
        let priority_score = priority(&keywords, &skill_terms, &domain_context);

        tracing::debug!(
            cleaned = %cleaned,
            skills = skill_terms.len(),
            domains = domain_context.len(),
            "processed query"
        );

        ProcessedQuery {
            original: text.to_string(),
            cleaned,
            keywords,
            skill_terms,
            experience_requirements,
            domain_context,
            priority_score,
        }
    }
}

fn keywords(cleaned: &str) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for token in text::tokens(cleaned) {
        if token.chars().count() < 2 || is_stopword(token) {
            continue;
        }
        out.insert(token.to_string());
        out.extend(synonyms_of(token).iter().map(|s| s.to_string()));
    }
    out
}

fn skill_terms(cleaned: &str, keywords: &BTreeSet<String>) -> BTreeSet<String> {
    let mut out: BTreeSet<String> = KNOWN_SKILLS
        .iter()
        .filter(|skill| contains_term(cleaned, skill))
        .map(|s| s.to_string())
        .collect();
    for keyword in keywords {
        if is_known_skill(keyword) {
            out.insert(keyword.clone());
        }
        out.extend(synonyms_of(keyword).iter().map(|s| s.to_string()));
    }
    if ML_ALIASES.iter().any(|alias| contains_term(cleaned, alias)) {
        out.insert("machine learning".to_string());
        out.insert("ml".to_string());
    }
    out
}

fn domains(cleaned: &str, keywords: &BTreeSet<String>) -> Vec<String> {
    DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, fragments)| {
            fragments
                .iter()
                .any(|f| contains_word_prefix(cleaned, f) || keywords.contains(*f))
        })
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// True when `text` (lowercase) mentions any indicator of `domain`.
pub fn mentions_domain(domain: &str, text: &str) -> bool {
    vocab::domain_keywords(domain)
        .iter()
        .any(|f| contains_word_prefix(text, f))
}

fn priority(keywords: &BTreeSet<String>, skills: &BTreeSet<String>, domains: &[String]) -> f32 {
    let mut score = 0.1 * keywords.len() as f32
        + 0.3 * skills.len() as f32
        + 0.2 * domains.len() as f32;
    if skills.len() > 2 {
        score += 0.5;
    }
    if domains.len() > 1 {
        score += 0.3;
    }
    score.min(5.0)
}
