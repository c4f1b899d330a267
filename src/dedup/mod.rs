//! Near-duplicate screening for the ingestion pipeline.
//!
//! Freshly fetched articles are scored against the recently stored batch;
//! anything at or above the threshold is reported back so the pipeline
//! drops it instead of inserting a reworded copy of a story it already
//! has. A pairwise sweep over a whole batch backs the maintenance path
//! that audits the stored corpus.

use serde::Serialize;
use tracing::{debug, info};

use crate::similarity::{self, Article, Weights};

/// Default composite-score threshold at which two articles count as
/// near-duplicates.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.85;

/// A screening hit: the candidate resembles one article in the recent
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    /// Position of the matched article in the recent batch.
    pub index: usize,
    /// Composite similarity score.
    pub score: f64,
    /// Score formatted as an integer percentage.
    pub percent: i64,
}

/// Score `candidate` against every article in `recent`.
///
/// Returns all matches with `score >= threshold`, sorted by score in
/// descending order.
pub fn screen(
    candidate: &Article,
    recent: &[Article],
    threshold: f64,
    weights: Weights,
) -> Vec<DuplicateMatch> {
    let mut matches = Vec::new();

    for (index, article) in recent.iter().enumerate() {
        let score = similarity::news_similarity(candidate, article, weights);
        debug!(index, score, "scored candidate against recent article");

        if score >= threshold {
            matches.push(DuplicateMatch {
                index,
                score,
                percent: similarity::to_percent(score),
            });
        }
    }

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));

    if let Some(best) = matches.first() {
        info!(
            title = %candidate.title,
            count = matches.len(),
            best = best.score,
            "near-duplicate candidate"
        );
    }

    matches
}

/// Find all near-duplicate pairs in a stored batch.
///
/// Returns `(i, j, score)` with `i < j` for every pair at or above the
/// threshold, sorted by score in descending order.
pub fn find_duplicate_pairs(
    articles: &[Article],
    threshold: f64,
    weights: Weights,
) -> Vec<(usize, usize, f64)> {
    let mut pairs = Vec::new();

    for i in 0..articles.len() {
        for j in i + 1..articles.len() {
            let score = similarity::news_similarity(&articles[i], &articles[j], weights);
            if score >= threshold {
                pairs.push((i, j, score));
            }
        }
    }

    pairs.sort_by(|a, b| b.2.total_cmp(&a.2));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, content: &str) -> Article {
        Article {
            title: title.to_owned(),
            content: content.to_owned(),
        }
    }

    fn sample_batch() -> Vec<Article> {
        vec![
            article(
                "태국 방콕에서 대규모 축제가 열렸습니다",
                "방콕 시내 중심가에서 열린 축제에 수만 명이 모였습니다",
            ),
            article(
                "치앙마이 폭우로 도로 침수",
                "북부 치앙마이 지역에 기록적인 폭우가 내려 도로가 침수됐습니다",
            ),
            article(
                "태국 관광객 수 회복세",
                "올해 태국을 찾은 외국인 관광객이 코로나 이전 수준을 회복했습니다",
            ),
        ]
    }

    #[test]
    fn test_identical_candidate_is_flagged() {
        let recent = sample_batch();
        let candidate = recent[0].clone();

        let matches = screen(
            &candidate,
            &recent,
            DEFAULT_DUPLICATE_THRESHOLD,
            Weights::default(),
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 0);
        assert!((matches[0].score - 1.0).abs() < 1e-12);
        assert_eq!(matches[0].percent, 100);
    }

    #[test]
    fn test_fresh_candidate_passes() {
        let recent = sample_batch();
        let candidate = article(
            "푸켓 국제공항 확장 공사 착수",
            "푸켓 공항이 늘어나는 수요에 맞춰 터미널 확장 공사를 시작했습니다",
        );

        let matches = screen(
            &candidate,
            &recent,
            DEFAULT_DUPLICATE_THRESHOLD,
            Weights::default(),
        );

        assert!(matches.is_empty());
    }

    #[test]
    fn test_matches_sorted_descending() {
        let mut recent = sample_batch();
        // A reworded copy of the first article: same title, body mostly shared.
        recent.push(article(
            "태국 방콕에서 대규모 축제가 열렸습니다",
            "방콕 시내 중심가에서 열린 축제에 수만 명이 몰렸습니다",
        ));
        let candidate = recent[0].clone();

        let matches = screen(&candidate, &recent, 0.8, Weights::default());

        assert!(matches.len() >= 2);
        assert_eq!(matches[0].index, 0);
        for window in matches.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn test_empty_batch() {
        let candidate = article("제목", "내용");
        let matches = screen(
            &candidate,
            &[],
            DEFAULT_DUPLICATE_THRESHOLD,
            Weights::default(),
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn test_find_duplicate_pairs() {
        let mut batch = sample_batch();
        batch.push(batch[0].clone());

        let pairs = find_duplicate_pairs(&batch, DEFAULT_DUPLICATE_THRESHOLD, Weights::default());

        assert_eq!(pairs.len(), 1);
        let (i, j, score) = pairs[0];
        assert_eq!((i, j), (0, 3));
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_duplicate_pairs_empty_and_clean() {
        assert!(find_duplicate_pairs(&[], 0.85, Weights::default()).is_empty());
        assert!(find_duplicate_pairs(&sample_batch(), 0.85, Weights::default()).is_empty());
    }
}
