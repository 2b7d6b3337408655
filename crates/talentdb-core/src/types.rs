//! Domain types shared by the query, vector and ranking crates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type EmployeeId = u64;

/// Current staffing state of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Availability {
    Available,
    OnNotice,
    Busy,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::OnNotice => "on_notice",
            Availability::Busy => "busy",
        }
    }

    /// Lenient parse used by the dataset loader; accepts any casing and the
    /// spaced/hyphenated spellings of `on_notice`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "available" => Some(Availability::Available),
            "on_notice" => Some(Availability::OnNotice),
            "busy" => Some(Availability::Busy),
            _ => None,
        }
    }
}

impl TryFrom<String> for Availability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Availability::parse(&value).ok_or_else(|| format!("unknown availability '{value}'"))
    }
}

impl From<Availability> for String {
    fn from(value: Availability) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate record.
///
/// - `skills` keep their original casing; matching is case-insensitive
/// - `projects` are free-text project titles
/// - the collection is immutable for the lifetime of one index build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub experience_years: u32,
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub availability: Availability,
}

/// Experience bounds extracted from a query. Both ends are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceRequirement {
    pub min_years: Option<u32>,
    pub max_years: Option<u32>,
}

impl ExperienceRequirement {
    pub fn is_empty(&self) -> bool {
        self.min_years.is_none() && self.max_years.is_none()
    }
}

/// Structured features derived purely from the query text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedQuery {
    pub original: String,
    pub cleaned: String,
    pub keywords: BTreeSet<String>,
    pub skill_terms: BTreeSet<String>,
    pub experience_requirements: ExperienceRequirement,
    /// Domain tags in the fixed order of the domain keyword table.
    pub domain_context: Vec<String>,
    /// Complexity estimate in `[0, 5]`.
    pub priority_score: f32,
}

/// One ranked candidate. `relevance_score` is unbounded, higher is better;
/// `confidence` is clamped to `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub employee: Employee,
    pub relevance_score: f32,
    pub match_reasons: Vec<String>,
    pub confidence: f32,
}

/// Similarity metric of the flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Inner product over L2-normalized rows (cosine).
    Ip,
    /// Euclidean distance; reported negated so higher is better.
    L2,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Ip => "ip",
            Metric::L2 => "l2",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-description reported by an embedding strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingStats {
    pub model: String,
    pub dimension: usize,
    pub provider: String,
    /// Whether queries are embedded in a retrieval-query mode distinct from documents.
    pub query_mode: bool,
    pub normalized: bool,
}
