use std::sync::LazyLock;

use regex::{Captures, Regex};
use talentdb_core::types::ExperienceRequirement;

#[derive(Clone, Copy)]
enum Rule {
    Range,
    MinYears,
    Level { min: Option<u32>, max: Option<u32> },
}

/// Ordered rules; for each of min/max the first rule that matches wins.
///
/// The order is a contract: an `N-M years` range, then `at least N years`,
/// then a bare `N years`, then level words (senior, junior, mid, lead).
/// The range comes first so "3-5 years" is not read as "at least 5".
/// Numeric phrasing beats level words only because it is tested earlier,
/// so "senior with 3 years" yields `min_years = 3`.
static RULES: LazyLock<Vec<(Regex, Rule)>> = LazyLock::new(|| {
    let entry = |pattern: &str, rule: Rule| {
        (Regex::new(pattern).expect("valid experience regex"), rule)
    };
    vec![
        entry(r"\b(\d+)\s*-\s*(\d+)\s*(?:years?|yrs?)\b", Rule::Range),
        entry(r"\b(?:minimum|min|at least)\s*(\d+)\s*\+?\s*(?:years?|yrs?)\b", Rule::MinYears),
        entry(r"\b(\d+)\s*\+?\s*(?:years?|yrs?)\b", Rule::MinYears),
        entry(r"\b(?:senior|sr)\b", Rule::Level { min: Some(5), max: None }),
        entry(r"\b(?:junior|jr|entry)\b", Rule::Level { min: None, max: Some(2) }),
        entry(r"\b(?:mid|middle|intermediate)\b", Rule::Level { min: Some(3), max: None }),
        entry(r"\b(?:lead|principal|architect)\b", Rule::Level { min: Some(5), max: None }),
    ]
});

pub fn extract(cleaned: &str) -> ExperienceRequirement {
    let mut req = ExperienceRequirement::default();
    for (re, rule) in RULES.iter() {
        let Some(caps) = re.captures(cleaned) else { continue };
        let (min, max) = match *rule {
            Rule::Range => (number(&caps, 1), number(&caps, 2)),
            Rule::MinYears => (number(&caps, 1), None),
            Rule::Level { min, max } => (min, max),
        };
        if req.min_years.is_none() {
            req.min_years = min;
        }
        if req.max_years.is_none() {
            req.max_years = max;
        }
    }
    req
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}
