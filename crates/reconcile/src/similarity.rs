use std::cmp::Ordering;

use crate::util::lcs_len;

/// Textual closeness of two strings on a 0–100 scale.
pub trait TextScorer: Send + Sync {
    fn score(&self, a: &str, b: &str) -> u8;
}

/// Best-window substring similarity; see [`partial_ratio`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl TextScorer for PartialRatio {
    fn score(&self, a: &str, b: &str) -> u8 {
        partial_ratio(a, b)
    }
}

/// Normalised indel similarity `2·LCS / (|a| + |b|)` in `[0.0, 100.0]`.
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Case-insensitive partial similarity: the shorter string is aligned
/// against every same-length window of the longer one, plus the truncated
/// windows hanging off either edge, and the best window ratio wins. A
/// substring scores 100; an empty input scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let best = match a.len().cmp(&b.len()) {
        Ordering::Less => best_alignment(&a, &b),
        Ordering::Greater => best_alignment(&b, &a),
        Ordering::Equal => best_alignment(&a, &b).max(best_alignment(&b, &a)),
    };

    // Half-way scores round to even.
    best.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Best ratio of `needle` against the windows of `haystack`, where
/// `needle.len() <= haystack.len()`.
fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    if haystack.windows(m).any(|w| w == needle) {
        return 100.0;
    }

    let prefixes = (1..m).map(|i| &haystack[..i]);
    let full = haystack.windows(m);
    let suffixes = (n - m + 1..n).map(|i| &haystack[i..]);

    let mut best = 0.0f64;
    for window in prefixes.chain(full).chain(suffixes) {
        best = best.max(ratio(needle, window));
    }
    best
}
