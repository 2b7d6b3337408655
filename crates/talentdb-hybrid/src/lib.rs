//! talentdb-hybrid
//!
//! Hybrid candidate ranking: the query is embedded together with its
//! extracted skills, domains and experience, the vector index returns an
//! over-fetched shortlist, and deterministic heuristics re-rank it with
//! explanations. [`SearchService`] wires strategy selection, the index and
//! the result cache together; [`Summarizer`] turns a shortlist into prose.

pub mod ranking;
pub mod scoring;
pub mod service;
pub mod summary;

pub use ranking::{composite_query, RankingEngine};
pub use scoring::{assess, Assessment};
pub use service::{SearchOutcome, SearchService, ServiceStatus};
pub use summary::{fallback_summary, Summarizer, NO_CANDIDATES_MESSAGE};
