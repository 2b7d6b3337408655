//! Heuristic re-scoring of vector hits: experience bounds, skill and domain
//! matches, availability. All adjustments are additive on top of similarity.

use talentdb_core::types::{Availability, Employee, ProcessedQuery};
use talentdb_query::mentions_domain;

pub const MIN_YEARS_MET: f32 = 0.3;
pub const MIN_YEARS_MISSED: f32 = -0.5;
pub const MAX_YEARS_MET: f32 = 0.2;
pub const MAX_YEARS_MISSED: f32 = -0.2;
pub const PER_SKILL: f32 = 0.4;
pub const PER_DOMAIN: f32 = 0.3;
pub const AVAILABLE: f32 = 0.1;
pub const BUSY: f32 = -0.2;

/// Everything the heuristics found out about one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub similarity: f32,
    pub score: f32,
    /// The employee's own skill name for each matched query term, in term order.
    pub matched_skills: Vec<String>,
    pub min_years_met: Option<bool>,
    pub max_years_met: Option<bool>,
    /// Query domains found in the employee's project titles.
    pub matched_domains: Vec<String>,
}

/// Score `employee` against `query`, starting from `similarity`.
pub fn assess(employee: &Employee, query: &ProcessedQuery, similarity: f32) -> Assessment {
    let mut score = similarity;
    let req = query.experience_requirements;
    let years = employee.experience_years;

    let min_years_met = req.min_years.map(|min| years >= min);
    match min_years_met {
        Some(true) => score += MIN_YEARS_MET,
        Some(false) => score += MIN_YEARS_MISSED,
        None => {}
    }
    let max_years_met = req.max_years.map(|max| years <= max);
    match max_years_met {
        Some(true) => score += MAX_YEARS_MET,
        Some(false) => score += MAX_YEARS_MISSED,
        None => {}
    }

    let skills_lower: Vec<String> = employee.skills.iter().map(|s| s.to_lowercase()).collect();
    let matched_skills: Vec<String> = query
        .skill_terms
        .iter()
        .filter_map(|term| {
            let term = term.to_lowercase();
            skills_lower
                .iter()
                .position(|s| s.contains(&term))
                .map(|i| employee.skills[i].clone())
        })
        .collect();
    score += PER_SKILL * matched_skills.len() as f32;

    let projects = employee.projects.join(" ").to_lowercase();
    let matched_domains: Vec<String> = query
        .domain_context
        .iter()
        .filter(|domain| mentions_domain(domain, &projects))
        .cloned()
        .collect();
    score += PER_DOMAIN * matched_domains.len() as f32;

    score += match employee.availability {
        Availability::Available => AVAILABLE,
        Availability::Busy => BUSY,
        Availability::OnNotice => 0.0,
    };

    Assessment { similarity, score, matched_skills, min_years_met, max_years_met, matched_domains }
}

/// Human-readable reasons: skills, experience, domains, availability.
/// A skill matched by several query terms is listed once.
pub fn match_reasons(employee: &Employee, assessment: &Assessment) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for skill in &assessment.matched_skills {
        let line = format!("Has required skill: {skill}");
        if !reasons.contains(&line) {
            reasons.push(line);
        }
    }
    if assessment.min_years_met == Some(true) {
        reasons.push(format!("Meets experience requirement: {} years", employee.experience_years));
    }
    if assessment.max_years_met == Some(true) {
        reasons.push(format!("Within experience range: {} years", employee.experience_years));
    }
    for domain in &assessment.matched_domains {
        reasons.push(format!("Has {domain} domain experience"));
    }
    if employee.availability == Availability::Available {
        reasons.push("Currently available".to_string());
    }
    reasons
}

/// Confidence in `[0, 100]`.
pub fn confidence(query: &ProcessedQuery, assessment: &Assessment) -> f32 {
    let mut c = (assessment.similarity * 100.0).min(45.0);

    let terms = query.skill_terms.len().max(1) as f32;
    c += assessment.matched_skills.len() as f32 / terms * 30.0;

    c += match assessment.min_years_met {
        Some(true) => 20.0,
        Some(false) => 0.0,
        None => 10.0,
    };

    if !query.domain_context.is_empty() {
        c += assessment.matched_domains.len() as f32 / query.domain_context.len() as f32 * 5.0;
    }
    c.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use talentdb_core::types::ExperienceRequirement;

    fn employee(years: u32, availability: Availability) -> Employee {
        Employee {
            id: 7,
            name: "Ines".into(),
            experience_years: years,
            skills: vec!["Python".into(), "Machine Learning".into()],
            projects: vec!["Patient Triage Service".into()],
            availability,
        }
    }

    fn query(min: Option<u32>, max: Option<u32>, skills: &[&str], domains: &[&str]) -> ProcessedQuery {
        ProcessedQuery {
            skill_terms: skills.iter().map(|s| s.to_string()).collect(),
            domain_context: domains.iter().map(|s| s.to_string()).collect(),
            experience_requirements: ExperienceRequirement { min_years: min, max_years: max },
            ..ProcessedQuery::default()
        }
    }

    #[test]
    fn min_years_boundary_is_inclusive() {
        let q = query(Some(5), None, &[], &[]);
        let at = assess(&employee(5, Availability::OnNotice), &q, 0.5);
        let below = assess(&employee(4, Availability::OnNotice), &q, 0.5);
        assert!((at.score - 0.8).abs() < 1e-6);
        assert!((below.score - 0.0).abs() < 1e-6);
    }

    #[test]
    fn max_years_bonus_and_penalty() {
        let q = query(None, Some(2), &[], &[]);
        assert!((assess(&employee(2, Availability::OnNotice), &q, 0.0).score - 0.2).abs() < 1e-6);
        assert!((assess(&employee(3, Availability::OnNotice), &q, 0.0).score + 0.2).abs() < 1e-6);
    }

    #[test]
    fn skills_domains_and_availability_add_up() {
        let q = query(None, None, &["machine learning", "ml", "python", "rust"], &["healthcare", "gaming"]);
        let a = assess(&employee(3, Availability::Busy), &q, 0.1);
        // "ml" is not a substring of either skill.
        assert_eq!(a.matched_skills, vec!["Machine Learning", "Python"]);
        assert_eq!(a.matched_domains, vec!["healthcare"]);
        let expected = 0.1 + 2.0 * PER_SKILL + PER_DOMAIN + BUSY;
        assert!((a.score - expected).abs() < 1e-6);
    }

    #[test]
    fn reasons_follow_fixed_order_without_duplicates() {
        let e = employee(6, Availability::Available);
        let q = query(Some(5), None, &["learning", "machine learning"], &["healthcare"]);
        let reasons = match_reasons(&e, &assess(&e, &q, 0.4));
        assert_eq!(
            reasons,
            vec![
                "Has required skill: Machine Learning",
                "Meets experience requirement: 6 years",
                "Has healthcare domain experience",
                "Currently available",
            ]
        );
    }

    #[test]
    fn confidence_terms() {
        let e = employee(6, Availability::Available);
        let empty = query(None, None, &[], &[]);
        // similarity capped at 45, no skills (denominator 1), experience absent.
        assert!((confidence(&empty, &assess(&e, &empty, 0.9)) - 55.0).abs() < 1e-4);

        let q = query(Some(8), None, &["python", "go"], &["healthcare", "fintech"]);
        let c = confidence(&q, &assess(&e, &q, 0.2));
        assert!((c - (20.0 + 15.0 + 0.0 + 2.5)).abs() < 1e-4, "{c}");
    }

    #[test]
    fn confidence_is_clamped_at_zero() {
        let q = query(Some(10), None, &["rust"], &[]);
        let e = employee(1, Availability::Busy);
        assert_eq!(confidence(&q, &assess(&e, &q, -3.0)), 0.0);
    }
}
