//! Folds scored posts into a [`LocalSentiment`].
//!
//! Overall figures are means over every post, not means of platform means.
//! Emotion weights are summed across posts and renormalized to sum to 1.

use std::collections::BTreeMap;
use std::sync::Arc;

use atlasiq_core::{Emotion, GeoPoint, LocalSentiment, Platform, Post, SentimentScore};
use chrono::Utc;

use crate::breakdown::{BreakdownEnricher, BreakdownScope, SummaryEnricher};
use crate::scorer::SentimentScorer;

/// A post paired with its individual score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPost<'a> {
    pub post: &'a Post,
    pub score: SentimentScore,
}

#[derive(Clone)]
pub struct SentimentAggregator {
    scorer: SentimentScorer,
    enricher: Arc<dyn BreakdownEnricher>,
}

impl std::fmt::Debug for SentimentAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAggregator")
            .field("scorer", &self.scorer)
            .finish_non_exhaustive()
    }
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::new(SentimentScorer::default(), Arc::new(SummaryEnricher))
    }
}

impl SentimentAggregator {
    #[must_use]
    pub fn new(scorer: SentimentScorer, enricher: Arc<dyn BreakdownEnricher>) -> Self {
        Self { scorer, enricher }
    }

    #[must_use]
    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    /// Scores and folds `posts`. An empty slice yields the all-zero result at
    /// `(0, 0)`.
    #[must_use]
    pub fn aggregate(&self, posts: &[Post]) -> LocalSentiment {
        self.aggregate_at(posts, None)
    }

    /// Like [`aggregate`](Self::aggregate), falling back to `origin` when no
    /// post carries a location.
    #[must_use]
    pub fn aggregate_at(&self, posts: &[Post], origin: Option<GeoPoint>) -> LocalSentiment {
        let scored: Vec<ScoredPost<'_>> = posts
            .iter()
            .map(|post| ScoredPost {
                post,
                score: self.scorer.score_post(post),
            })
            .collect();
        self.aggregate_scored(&scored, origin)
    }

    /// Folds posts that already carry their scores.
    #[must_use]
    pub fn aggregate_scored(
        &self,
        scored: &[ScoredPost<'_>],
        origin: Option<GeoPoint>,
    ) -> LocalSentiment {
        let fallback = origin.unwrap_or_default();
        if scored.is_empty() {
            return LocalSentiment::empty(fallback);
        }

        let mut by_platform: BTreeMap<Platform, Vec<&ScoredPost<'_>>> = BTreeMap::new();
        for sp in scored {
            by_platform.entry(sp.post.platform).or_default().push(sp);
        }

        let per_platform = by_platform
            .iter()
            .map(|(platform, posts)| {
                (
                    *platform,
                    self.fold(BreakdownScope::Platform(*platform), posts),
                )
            })
            .collect();

        let all: Vec<&ScoredPost<'_>> = scored.iter().collect();
        let overall = self.fold(BreakdownScope::Overall, &all);

        let location = scored
            .first()
            .and_then(|sp| sp.post.location)
            .unwrap_or(fallback);

        LocalSentiment {
            location,
            overall,
            per_platform,
            total_posts: scored.len(),
            timestamp: Utc::now(),
        }
    }

    /// Mean score and confidence plus merged emotions for a non-empty group.
    #[allow(clippy::cast_precision_loss)]
    fn fold(&self, scope: BreakdownScope, posts: &[&ScoredPost<'_>]) -> SentimentScore {
        let n = posts.len() as f64;
        let score = posts.iter().map(|sp| sp.score.score).sum::<f64>() / n;
        let confidence = posts.iter().map(|sp| sp.score.confidence).sum::<f64>() / n;
        let emotions = merge_emotions(posts.iter().map(|sp| &sp.score.emotions));

        let folded = SentimentScore::new(score, confidence, emotions);
        let breakdown = self.enricher.breakdown(scope, &folded, posts);
        folded.with_breakdown(breakdown)
    }
}

/// Sums weights per label and rescales them to total 1. An all-zero total
/// yields an empty map.
fn merge_emotions<'a>(
    maps: impl Iterator<Item = &'a BTreeMap<Emotion, f64>>,
) -> BTreeMap<Emotion, f64> {
    let totals = maps
        .flat_map(|m| m.iter())
        .fold(BTreeMap::<Emotion, f64>::new(), |mut acc, (emotion, weight)| {
            *acc.entry(*emotion).or_insert(0.0) += weight;
            acc
        });

    let sum: f64 = totals.values().sum();
    if sum <= 0.0 {
        return BTreeMap::new();
    }
    totals
        .into_iter()
        .filter(|(_, weight)| *weight > 0.0)
        .map(|(emotion, weight)| (emotion, weight / sum))
        .collect()
}
