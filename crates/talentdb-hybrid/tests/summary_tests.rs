use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use talentdb_cache::{MemoryCache, ResultCache};
use talentdb_core::traits::SummaryGenerator;
use talentdb_core::types::{Availability, Employee, SearchResult};
use talentdb_core::{Error, Result};
use talentdb_hybrid::summary::{candidate_context, user_prompt, MAX_TOKENS, SYSTEM_PROMPT};
use talentdb_hybrid::{fallback_summary, Summarizer, NO_CANDIDATES_MESSAGE};

#[derive(Default)]
struct Scripted {
    calls: AtomicUsize,
    fail: bool,
    last_user_prompt: Mutex<String>,
}

impl SummaryGenerator for Scripted {
    fn generate(&self, system: &str, user: &str, max_tokens: u32, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(system, SYSTEM_PROMPT);
        assert_eq!(max_tokens, MAX_TOKENS);
        *self.last_user_prompt.lock() = user.to_string();
        if self.fail {
            return Err(Error::EmbeddingProvider("no candidate text".into()));
        }
        Ok("Priya is the strongest fit.".into())
    }
}

fn result(id: u64, name: &str, score: f32, reasons: &[&str]) -> SearchResult {
    SearchResult {
        employee: Employee {
            id,
            name: name.into(),
            experience_years: 4,
            skills: (0..15).map(|i| format!("Skill{i}")).collect(),
            projects: vec!["Clinic Scheduler".into()],
            availability: Availability::Available,
        },
        relevance_score: score,
        match_reasons: reasons.iter().map(|s| s.to_string()).collect(),
        confidence: 60.0,
    }
}

fn shortlist() -> Vec<SearchResult> {
    vec![
        result(11, "Priya", 1.456, &["Has required skill: Skill1", "Currently available"]),
        result(12, "Omar", 0.5, &[]),
    ]
}

fn summarizer(generator: Option<Arc<Scripted>>) -> (Summarizer, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::new("ai:summary", 8));
    let generator = generator.map(|g| g as Arc<dyn SummaryGenerator>);
    (Summarizer::new(generator, cache.clone(), Duration::from_secs(600)), cache)
}

#[test]
fn empty_shortlist_gets_guidance() {
    let (s, _) = summarizer(Some(Arc::new(Scripted::default())));
    assert_eq!(s.summarize("rust", &[]), NO_CANDIDATES_MESSAGE);
    assert!(NO_CANDIDATES_MESSAGE.contains("Try broader search terms"));
}

#[test]
fn generated_summary_is_cached_per_shortlist() {
    let generator = Arc::new(Scripted::default());
    let (s, cache) = summarizer(Some(generator.clone()));

    assert_eq!(s.summarize("Clinic devs", &shortlist()), "Priya is the strongest fit.");
    assert_eq!(s.summarize("  clinic   DEVS", &shortlist()), "Priya is the strongest fit.");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.size(), Some(1));

    let mut reordered = shortlist();
    reordered.reverse();
    s.summarize("clinic devs", &reordered);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2, "new shortlist, new key");

    let prompt = generator.last_user_prompt.lock().clone();
    assert!(prompt.starts_with("User Query: \"clinic devs\""));
    assert!(prompt.contains("Candidate 1: Omar"));
}

#[test]
fn generator_failure_falls_back_and_is_not_cached() {
    let generator = Arc::new(Scripted { fail: true, ..Scripted::default() });
    let (s, cache) = summarizer(Some(generator.clone()));
    let text = s.summarize("clinic", &shortlist());
    assert_eq!(text, fallback_summary(&shortlist()));
    assert_eq!(cache.size(), Some(0));
    s.summarize("clinic", &shortlist());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn no_generator_uses_listing() {
    let (s, _) = summarizer(None);
    let text = s.summarize("clinic", &shortlist());
    assert!(text.starts_with("I've identified 2 candidates for your requirements:\n"));
    assert!(text.contains("1. Priya - 4 years (Score: 1.46)"));
    assert!(text.contains("   - Match Reasons: Has required skill: Skill1; Currently available"));
    assert!(!text.contains("Skill12"), "skills are capped at twelve");
    assert!(text.ends_with("Would you like more specific information about any of these candidates?"));

    let one = fallback_summary(&shortlist()[1..]);
    assert!(one.starts_with("I've identified 1 candidate for"));
    assert!(!one.contains("Match Reasons"));
}

#[test]
fn prompt_context_lists_each_candidate() {
    let context = candidate_context(&shortlist());
    let blocks: Vec<&str> = context.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].starts_with("Candidate 1: Priya\nExperience: 4 years | Match Score: 1.46\n"));
    assert!(blocks[1].ends_with("Why they fit: "));
    assert!(user_prompt("q", &shortlist()).ends_with("based on the user's query."));
}
