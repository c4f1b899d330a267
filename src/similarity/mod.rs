//! Text similarity engine for near-duplicate news detection.
//!
//! Two base metrics with deliberately different granularity, blended into
//! a single composite score:
//!
//! - [`levenshtein`] — character-level edit similarity, applied to titles
//! - [`jaccard`] — token-set overlap, applied to body text
//!
//! The ingestion pipeline compares a freshly fetched article against the
//! recently stored batch via [`news_similarity`] and thresholds the result
//! (see [`crate::dedup`]). Everything here is a stateless pure function;
//! pair comparisons can run on any thread without coordination.

pub mod jaccard;
pub mod levenshtein;

use serde::{Deserialize, Serialize};

/// Default weight of title similarity in the composite score.
pub const DEFAULT_TITLE_WEIGHT: f64 = 0.4;

/// Default weight of content similarity in the composite score.
pub const DEFAULT_CONTENT_WEIGHT: f64 = 0.6;

/// Title/content weight pair for the composite score.
///
/// Weights are not validated and need not sum to 1; a pair that does not
/// yields composite scores outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight applied to title (Levenshtein) similarity.
    pub title: f64,
    /// Weight applied to content (Jaccard) similarity.
    pub content: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_WEIGHT,
            content: DEFAULT_CONTENT_WEIGHT,
        }
    }
}

/// A news article as the screening layer sees it: title plus body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

/// Per-metric breakdown of one article-pair comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    /// Levenshtein similarity of the two titles.
    pub title: f64,
    /// Jaccard similarity of the two bodies.
    pub content: f64,
}

impl ScoreBreakdown {
    /// Blend the breakdown into a single weighted score.
    pub fn composite(&self, weights: Weights) -> f64 {
        self.title * weights.title + self.content * weights.content
    }
}

/// Score both metrics for an article pair.
pub fn compare(a: &Article, b: &Article) -> ScoreBreakdown {
    ScoreBreakdown {
        title: levenshtein::similarity(&a.title, &b.title),
        content: jaccard::similarity(&a.content, &b.content),
    }
}

/// Composite similarity between two articles: title similarity (edit
/// distance) and content similarity (token overlap), weighted.
pub fn news_similarity(a: &Article, b: &Article, weights: Weights) -> f64 {
    compare(a, b).composite(weights)
}

/// Format a [0, 1] similarity score as an integer percentage.
///
/// Rounds half away from zero. Out-of-range scores from non-normalized
/// weights pass through unclamped.
pub fn to_percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}
