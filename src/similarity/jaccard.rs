//! Token-set (Jaccard) similarity.
//!
//! Used for content comparison: article bodies are long, so edit distance
//! is too expensive at O(m*n) and too sensitive to paraphrasing, while
//! word overlap survives reordering and light rewording.

use std::collections::HashSet;

/// Split text into the set of unique lowercase whitespace-separated
/// tokens.
///
/// The empty string yields an empty set.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Compute the Jaccard index between the token sets of two strings
/// (0.0 = disjoint, 1.0 = identical).
///
/// `|intersection| / |union|`, case-insensitive by construction. Two empty
/// inputs count as identical (1.0); exactly one empty input scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let set_a = tokenize(a);
    let set_b = tokenize(b);

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_dedupes() {
        let tokens = tokenize("News NEWS update Update today");
        assert_eq!(tokens.len(), 3);
        assert!(tokens.contains("news"));
        assert!(tokens.contains("update"));
        assert!(tokens.contains("today"));
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_identical_korean() {
        let s = "태국 방콕에서 대규모 축제가 열렸습니다";
        assert!((similarity(s, s) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_edge_cases() {
        assert_eq!(similarity("", "텍스트"), 0.0);
        assert_eq!(similarity("텍스트", ""), 0.0);
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_overlap() {
        // {a b c d} vs {a b c e}: 3 shared of 5 total.
        let s = similarity("a b c d", "a b c e");
        assert!((s - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_case_insensitive() {
        assert!((similarity("Bangkok Festival", "bangkok festival") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_word_order_irrelevant() {
        assert!((similarity("축제 방콕 대규모", "방콕 대규모 축제") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_symmetric() {
        let a = "태국 치앙마이 폭우 경보 발령";
        let b = "치앙마이 폭우 피해 속출";
        assert!((similarity(a, b) - similarity(b, a)).abs() < f64::EPSILON);
    }
}
