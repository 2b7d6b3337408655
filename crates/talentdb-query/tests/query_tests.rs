use proptest::prelude::*;

use talentdb_query::{mentions_domain, QueryProcessor};

#[test]
fn python_healthcare_scenario() {
    let q = QueryProcessor::new().process("Python developer with 5+ years experience in healthcare");
    assert_eq!(q.experience_requirements.min_years, Some(5));
    assert_eq!(q.experience_requirements.max_years, None);
    assert!(q.skill_terms.contains("python"), "skills: {:?}", q.skill_terms);
    assert_eq!(q.domain_context, vec!["healthcare".to_string()]);
}

#[test]
fn ml_alias_pulls_in_both_spellings() {
    let q = QueryProcessor::new().process("ML engineer for healthcare project");
    assert!(q.skill_terms.contains("machine learning"));
    assert!(q.skill_terms.contains("ml"));
    assert!(q.domain_context.contains(&"healthcare".to_string()));
}

#[test]
fn html_does_not_trigger_ml() {
    let q = QueryProcessor::new().process("HTML and CSS designer");
    assert!(q.skill_terms.contains("html"));
    assert!(q.skill_terms.contains("css"));
    assert!(!q.skill_terms.contains("ml"), "skills: {:?}", q.skill_terms);
}

#[test]
fn abbreviations_and_ranges() {
    let q = QueryProcessor::new().process("React dev w/ 3-5 yrs exp in fintech & payments");
    assert_eq!(q.cleaned, "react developer with 3-5 yrs experience in fintech and payments");
    assert_eq!(q.experience_requirements.min_years, Some(3));
    assert_eq!(q.experience_requirements.max_years, Some(5));
    assert!(q.skill_terms.contains("react"));
    assert!(q.skill_terms.contains("reactjs"), "synonym expansion");
    assert_eq!(q.domain_context, vec!["fintech".to_string()]);
}

#[test]
fn domains_are_reported_in_table_order() {
    let q = QueryProcessor::new().process("game studio building a patient portal");
    assert_eq!(q.domain_context, vec!["healthcare".to_string(), "gaming".to_string()]);
}

#[test]
fn empty_query_degrades_to_empty_features() {
    let q = QueryProcessor::new().process("   ?!  ");
    assert!(q.cleaned.is_empty());
    assert!(q.keywords.is_empty());
    assert!(q.skill_terms.is_empty());
    assert!(q.domain_context.is_empty());
    assert!(q.experience_requirements.is_empty());
    assert_eq!(q.priority_score, 0.0);
}

#[test]
fn project_text_domain_matching() {
    assert!(mentions_domain("healthcare", "medical diagnosis platform"));
    assert!(!mentions_domain("healthcare", "inventory service"));
    assert!(!mentions_domain("unknown-domain", "medical"));
}

proptest! {
    #[test]
    fn never_panics_and_stays_bounded(input in "\\PC{0,200}") {
        let q = QueryProcessor::new().process(&input);
        prop_assert!(q.priority_score >= 0.0 && q.priority_score <= 5.0);
        prop_assert_eq!(q.original, input);
    }

    #[test]
    fn processing_is_deterministic(input in "[a-zA-Z0-9 +.&/-]{0,80}") {
        let p = QueryProcessor::new();
        prop_assert_eq!(p.process(&input), p.process(&input));
    }
}
