//! Dataset fingerprint used to decide whether persisted embeddings and
//! indices still describe the current employee collection.

use blake3::Hasher;

use crate::types::Employee;

/// Deterministic hash over every field that feeds an embedding.
///
/// Skills and projects are hashed in sorted order so reordering them is not
/// a change; every field is length-prefixed so values cannot bleed into each
/// other (`["ab","c"]` and `["a","bc"]` hash differently). The record count
/// is mixed in last.
pub fn dataset_fingerprint(employees: &[Employee]) -> String {
    let mut hasher = Hasher::new();
    for e in employees {
        hasher.update(&e.id.to_le_bytes());
        put_str(&mut hasher, &e.name);
        hasher.update(&e.experience_years.to_le_bytes());
        put_sorted(&mut hasher, &e.skills);
        put_sorted(&mut hasher, &e.projects);
        put_str(&mut hasher, e.availability.as_str());
    }
    hasher.update(&(employees.len() as u64).to_le_bytes());
    hasher.finalize().to_hex().to_string()
}

fn put_str(hasher: &mut Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn put_sorted(hasher: &mut Hasher, items: &[String]) {
    let mut sorted: Vec<&str> = items.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    hasher.update(&(sorted.len() as u64).to_le_bytes());
    for s in sorted {
        put_str(hasher, s);
    }
}
