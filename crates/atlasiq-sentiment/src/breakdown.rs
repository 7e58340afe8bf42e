//! Breakdown enrichment for aggregate scores.
//!
//! The aggregator asks a [`BreakdownEnricher`] to explain each score it
//! produces: once for the overall score and once per platform. The default
//! [`SummaryEnricher`] only writes a summary line; [`CategoryEnricher`] also
//! groups posts into named factors by keyword.

use std::collections::BTreeSet;

use atlasiq_core::{
    default_categories, CategoryConfig, Platform, SentimentBreakdown, SentimentFactor,
    SentimentScore,
};

use crate::aggregate::ScoredPost;
use crate::lexicon::words;
use crate::preprocess::TextPreprocessor;

/// Score above which a summary calls sentiment positive; its negation is the
/// negative threshold.
const POLARITY_BAND: f64 = 0.25;

/// Which aggregate a breakdown describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownScope {
    Overall,
    Platform(Platform),
}

impl std::fmt::Display for BreakdownScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakdownScope::Overall => f.write_str("Overall"),
            BreakdownScope::Platform(p) => write!(f, "{p}"),
        }
    }
}

pub trait BreakdownEnricher: Send + Sync {
    /// `posts` holds only the posts that fed `score`.
    fn breakdown(
        &self,
        scope: BreakdownScope,
        score: &SentimentScore,
        posts: &[&ScoredPost<'_>],
    ) -> SentimentBreakdown;
}

/// Summary line only, no factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryEnricher;

impl SummaryEnricher {
    #[must_use]
    pub fn summary(scope: BreakdownScope, score: &SentimentScore, post_count: usize) -> String {
        let band = if score.score > POLARITY_BAND {
            "positive"
        } else if score.score < -POLARITY_BAND {
            "negative"
        } else {
            "mixed"
        };
        let noun = if post_count == 1 { "post" } else { "posts" };
        format!(
            "{scope} sentiment is {band} ({:+.2}) across {post_count} {noun}.",
            score.score
        )
    }
}

impl BreakdownEnricher for SummaryEnricher {
    fn breakdown(
        &self,
        scope: BreakdownScope,
        score: &SentimentScore,
        posts: &[&ScoredPost<'_>],
    ) -> SentimentBreakdown {
        SentimentBreakdown {
            factors: Vec::new(),
            summary: Self::summary(scope, score, posts.len()),
        }
    }
}

/// Groups posts into category factors by keyword occurrence.
#[derive(Debug, Clone)]
pub struct CategoryEnricher {
    categories: Vec<CategoryConfig>,
}

impl Default for CategoryEnricher {
    fn default() -> Self {
        Self::new(default_categories())
    }
}

impl CategoryEnricher {
    /// Keywords are matched lowercase; callers loading from YAML get that
    /// normalization from [`atlasiq_core::load_categories`].
    #[must_use]
    pub fn new(categories: Vec<CategoryConfig>) -> Self {
        Self { categories }
    }

    fn factors_for(
        &self,
        platform: Platform,
        texts: &[(Vec<String>, f64)],
    ) -> Vec<SentimentFactor> {
        let mut factors = Vec::new();
        for category in &self.categories {
            let mut matched_keywords: BTreeSet<&str> = BTreeSet::new();
            let mut scores: Vec<f64> = Vec::new();

            for (text_words, score) in texts {
                let hits: Vec<&str> = category
                    .keywords
                    .iter()
                    .map(String::as_str)
                    .filter(|kw| mentions(text_words, kw))
                    .collect();
                if !hits.is_empty() {
                    matched_keywords.extend(hits);
                    scores.push(*score);
                }
            }

            if scores.is_empty() {
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let impact = scores.iter().sum::<f64>() / scores.len() as f64;
            let noun = if scores.len() == 1 { "post" } else { "posts" };
            let keywords: Vec<&str> = matched_keywords.into_iter().collect();
            factors.push(SentimentFactor::new(
                category.name.clone(),
                format!("{} {noun} mention {}", scores.len(), keywords.join(", ")),
                impact,
                platform.to_string(),
            ));
        }
        factors
    }
}

/// Whole-word match; a multi-word keyword must appear as a contiguous run.
fn mentions(text_words: &[String], keyword: &str) -> bool {
    let needle = words(keyword);
    !needle.is_empty()
        && text_words
            .windows(needle.len())
            .any(|window| window == needle.as_slice())
}

impl BreakdownEnricher for CategoryEnricher {
    fn breakdown(
        &self,
        scope: BreakdownScope,
        score: &SentimentScore,
        posts: &[&ScoredPost<'_>],
    ) -> SentimentBreakdown {
        let platforms: Vec<Platform> = match scope {
            BreakdownScope::Overall => Platform::ALL.to_vec(),
            BreakdownScope::Platform(p) => vec![p],
        };

        let mut factors: Vec<SentimentFactor> = platforms
            .into_iter()
            .flat_map(|platform| {
                let texts: Vec<(Vec<String>, f64)> = posts
                    .iter()
                    .filter(|sp| sp.post.platform == platform)
                    .filter_map(|sp| {
                        let text = sp.post.text.as_deref()?;
                        Some((words(&TextPreprocessor::clean(text)), sp.score.score))
                    })
                    .collect();
                self.factors_for(platform, &texts)
            })
            .collect();

        factors.sort_by(|a, b| {
            b.impact
                .abs()
                .total_cmp(&a.impact.abs())
                .then_with(|| a.category.cmp(&b.category))
        });

        SentimentBreakdown {
            factors,
            summary: SummaryEnricher::summary(scope, score, posts.len()),
        }
    }
}
