use crate::engine::word::normalize_text;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    pub is_match: bool,
    pub confidence: f64,
}

/// Edit distance over chars (insert, delete, substitute all cost 1).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

pub fn compare(spoken: &str, target: &str, threshold: f64) -> MatchResult {
    let spoken = normalize_text(spoken);
    let target = normalize_text(target);
    if spoken == target {
        return MatchResult {
            is_match: true,
            confidence: 1.0,
        };
    }

    let max_len = spoken.chars().count().max(target.chars().count());
    let similarity = 1.0 - levenshtein(&spoken, &target) as f64 / max_len as f64;
    MatchResult {
        is_match: similarity >= threshold,
        confidence: similarity,
    }
}

/// Scan every token of every transcript alternative and return the best
/// matching token with its confidence.
pub fn best_match<S: AsRef<str>>(
    alternatives: &[S],
    target: &str,
    threshold: f64,
) -> Option<(String, f64)> {
    let mut best: Option<(String, f64)> = None;
    for alt in alternatives {
        for token in alt.as_ref().split_whitespace() {
            let result = compare(token, target, threshold);
            if result.is_match && best.as_ref().is_none_or(|(_, c)| result.confidence > *c) {
                best = Some((normalize_text(token), result.confidence));
            }
        }
    }
    best
}
