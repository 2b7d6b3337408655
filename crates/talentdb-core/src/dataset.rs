//! Loading the employee collection from its JSON export.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Availability, Employee};

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Wrapped { employees: Vec<Employee> },
    Bare(Vec<Employee>),
}

/// Read employees from `{"employees": [...]}` or a bare JSON array.
pub fn load_employees(path: &Path) -> Result<Vec<Employee>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Dataset(format!("cannot read {}: {}", path.display(), e)))?;
    parse_employees(&raw)
}

pub fn parse_employees(raw: &str) -> Result<Vec<Employee>> {
    let employees = match serde_json::from_str::<DatasetFile>(raw)
        .map_err(|e| Error::Dataset(format!("unrecognised dataset layout: {e}")))?
    {
        DatasetFile::Wrapped { employees } => employees,
        DatasetFile::Bare(employees) => employees,
    };
    validate(&employees)?;
    tracing::debug!(count = employees.len(), "parsed employee dataset");
    Ok(employees)
}

fn validate(employees: &[Employee]) -> Result<()> {
    let mut seen = HashSet::with_capacity(employees.len());
    for e in employees {
        if !seen.insert(e.id) {
            return Err(Error::Dataset(format!("duplicate employee id {}", e.id)));
        }
    }
    Ok(())
}

/// Structured lookup over the raw dataset. Every set criterion must hold;
/// empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of at least one skill.
    pub skill: Option<String>,
    pub min_experience: u32,
    pub availability: Option<Availability>,
    /// Case-insensitive substring of the name, the joined skills or the
    /// joined projects.
    pub text: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(skill) = non_empty(&self.skill) {
            if !employee.skills.iter().any(|s| s.to_lowercase().contains(&skill)) {
                return false;
            }
        }
        if employee.experience_years < self.min_experience {
            return false;
        }
        if self.availability.is_some_and(|a| a != employee.availability) {
            return false;
        }
        if let Some(text) = non_empty(&self.text) {
            let hit = employee.name.to_lowercase().contains(&text)
                || employee.skills.join(" ").to_lowercase().contains(&text)
                || employee.projects.join(" ").to_lowercase().contains(&text);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_lowercase)
}

/// Employees passing `filter`, in dataset order.
pub fn filter_employees<'a>(employees: &'a [Employee], filter: &EmployeeFilter) -> Vec<&'a Employee> {
    employees.iter().filter(|e| filter.matches(e)).collect()
}
