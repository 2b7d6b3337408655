//! Document-side text for an employee: what gets embedded per row.

use crate::types::Employee;

/// Skill-combination rules: (label, any-of skills, optional second any-of
/// skills, optional project fragments). All comparisons are lowercase.
struct SpecializationRule {
    label: &'static str,
    any_skill: &'static [&'static str],
    also_skill: &'static [&'static str],
    project_hint: &'static [&'static str],
}

const SPECIALIZATIONS: &[SpecializationRule] = &[
    SpecializationRule {
        label: "artificial intelligence and machine learning specialist",
        any_skill: &["tensorflow", "pytorch", "scikit-learn", "machine learning", "ai"],
        also_skill: &[],
        project_hint: &[],
    },
    SpecializationRule {
        label: "full-stack web application developer",
        any_skill: &["python", "javascript", "react"],
        also_skill: &["django", "flask", "nodejs", "express"],
        project_hint: &[],
    },
    SpecializationRule {
        label: "mobile application developer",
        any_skill: &["ios", "android", "react native", "flutter", "swift", "kotlin"],
        also_skill: &[],
        project_hint: &[],
    },
    SpecializationRule {
        label: "data science and analytics expert",
        any_skill: &["python", "sql", "pandas", "numpy"],
        also_skill: &[],
        project_hint: &["data", "analytics", "visualization"],
    },
    SpecializationRule {
        label: "cloud infrastructure and DevOps engineer",
        any_skill: &["aws", "docker", "kubernetes", "terraform", "devops"],
        also_skill: &[],
        project_hint: &[],
    },
    SpecializationRule {
        label: "frontend user interface specialist",
        any_skill: &["react", "vue", "angular", "typescript", "css"],
        also_skill: &[],
        project_hint: &[],
    },
    SpecializationRule {
        label: "backend systems and API developer",
        any_skill: &["python", "java", "nodejs", "go", "rust"],
        also_skill: &["api", "microservices", "database"],
        project_hint: &[],
    },
];

const PROJECT_DOMAINS: &[(&str, &[&str])] = &[
    ("healthcare and medical systems", &["health", "medical", "patient", "hospital", "clinic"]),
    ("e-commerce and retail solutions", &["shop", "commerce", "retail", "payment", "checkout"]),
    ("financial technology and services", &["banking", "finance", "payment", "trading", "crypto"]),
    ("educational technology", &["education", "learning", "course", "student", "school"]),
    ("game development", &["game", "gaming", "unity", "unreal"]),
    ("social media and communication platforms", &["social", "chat", "messaging", "communication"]),
];

/// The string embedded for `employee`, segments joined by `" | "`.
pub fn profile_text(employee: &Employee) -> String {
    let mut parts = vec![
        format!("Employee: {}", employee.name),
        format!("Technical Skills: {}", employee.skills.join(", ")),
        format!("Professional Experience: {} years in the industry", employee.experience_years),
        format!("Project Portfolio: {}", employee.projects.join(", ")),
        format!("Current Status: {}", employee.availability),
    ];
    let specializations = specializations(employee);
    if !specializations.is_empty() {
        parts.push(format!("Specialization Areas: {}", specializations.join(", ")));
    }
    let domains = project_domains(employee);
    if !domains.is_empty() {
        parts.push(format!("Domain Expertise: {}", domains.join(", ")));
    }
    parts.join(" | ")
}

pub fn specializations(employee: &Employee) -> Vec<&'static str> {
    let skills: Vec<String> = employee.skills.iter().map(|s| s.to_lowercase()).collect();
    let projects: Vec<String> = employee.projects.iter().map(|p| p.to_lowercase()).collect();
    let has_skill = |set: &[&str]| skills.iter().any(|s| set.contains(&s.as_str()));

    SPECIALIZATIONS
        .iter()
        .filter(|rule| has_skill(rule.any_skill))
        .filter(|rule| rule.also_skill.is_empty() || has_skill(rule.also_skill))
        .filter(|rule| {
            rule.project_hint.is_empty()
                || projects.iter().any(|p| rule.project_hint.iter().any(|h| p.contains(h)))
        })
        .map(|rule| rule.label)
        .collect()
}

pub fn project_domains(employee: &Employee) -> Vec<&'static str> {
    let text = employee.projects.join(" ").to_lowercase();
    PROJECT_DOMAINS
        .iter()
        .filter(|(_, hints)| hints.iter().any(|h| text.contains(h)))
        .map(|(label, _)| *label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Availability;

    fn ml_engineer() -> Employee {
        Employee {
            id: 1,
            name: "Dana".into(),
            experience_years: 6,
            skills: vec!["Python".into(), "TensorFlow".into()],
            projects: vec!["Medical Diagnosis Platform".into()],
            availability: Availability::Available,
        }
    }

    #[test]
    fn profile_lists_core_fields_in_order() {
        let text = profile_text(&ml_engineer());
        assert!(text.starts_with("Employee: Dana | Technical Skills: Python, TensorFlow | Professional Experience: 6 years"));
        assert!(text.contains("Current Status: available"));
    }

    #[test]
    fn derived_clauses_follow_skills_and_projects() {
        let e = ml_engineer();
        assert_eq!(specializations(&e), vec!["artificial intelligence and machine learning specialist"]);
        assert_eq!(project_domains(&e), vec!["healthcare and medical systems"]);
        let text = profile_text(&e);
        assert!(text.ends_with("Domain Expertise: healthcare and medical systems"));
    }
}
