use talentdb_core::types::EmployeeId;

/// Longest summary key kept; longer keys are cut at a char boundary.
pub const MAX_SUMMARY_KEY_CHARS: usize = 512;

/// Lowercase with whitespace runs collapsed, so trivially different
/// spellings of a query share an entry.
pub fn normalize_query(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Key for a ranked result list. The dataset fingerprint namespaces the key,
/// so a reload never serves rankings computed over the old data.
pub fn query_cache_key(query: &str, top_k: usize, fingerprint: &str) -> String {
    let ns = fingerprint.get(..16).unwrap_or(fingerprint);
    format!("{ns}:{top_k}:{}", normalize_query(query))
}

/// Key for a generated summary: the query plus the ids of the top five
/// candidates, so a change in the shortlist is a different entry.
pub fn summary_cache_key(query: &str, ids: &[EmployeeId]) -> String {
    let ids: Vec<String> = ids.iter().take(5).map(ToString::to_string).collect();
    let key = format!("q:{}|ids:{}", normalize_query(query), ids.join(","));
    key.chars().take(MAX_SUMMARY_KEY_CHARS).collect()
}
