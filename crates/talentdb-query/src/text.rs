//! Query normalization and boundary-aware term matching.

use std::sync::LazyLock;

use regex::Regex;

use crate::vocab::ABBREVIATIONS;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s+\-.]").expect("valid disallowed-char regex"));

const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Lowercase, rewrite abbreviations per token, strip characters outside
/// `[word, whitespace, +, -, .]` and collapse whitespace.
///
/// Abbreviations are matched against whole tokens, so `exp` expands but
/// `experience` is left alone.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let rewritten: Vec<&str> = lowered
        .split_whitespace()
        .map(|token| {
            let core = token.trim_end_matches(TRAILING_PUNCT);
            ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == core || *abbr == token)
                .map_or(token, |(_, full)| *full)
        })
        .collect();
    let joined = rewritten.join(" ");
    let stripped = DISALLOWED.replace_all(&joined, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens with surrounding dots removed (`node.js` survives, `python.` does not).
pub fn tokens(cleaned: &str) -> impl Iterator<Item = &str> {
    cleaned
        .split_whitespace()
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
}

/// `term` occurs in `text` with no alphanumeric character on either side.
pub fn contains_term(text: &str, term: &str) -> bool {
    scan(text, term, true)
}

/// `term` occurs in `text` at the start of a word; the word may continue
/// (`payment` hits `payments`, `store` misses `restore`).
pub fn contains_word_prefix(text: &str, term: &str) -> bool {
    scan(text, term, false)
}

fn scan(text: &str, term: &str, right_boundary: bool) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term).any(|(i, m)| {
        let before = text[..i].chars().next_back();
        let after = text[i + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric)
            && (!right_boundary || !after.is_some_and(char::is_alphanumeric))
    })
}
