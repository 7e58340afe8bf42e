//! Sentiment result model consumed by presentation layers.
//!
//! Constructors clamp every bounded quantity, so a `SentimentScore` or
//! `SentimentFactor` can never hold an out-of-range value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{GeoPoint, Platform};

/// Fixed emotion labels detected by keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
    ];
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
        };
        f.write_str(label)
    }
}

/// One named contributor to an aggregate score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentFactor {
    /// Free-form label, e.g. `"Transportation"`.
    pub category: String,
    pub description: String,
    /// In `[-1.0, 1.0]`.
    pub impact: f64,
    /// Platform display name the factor was observed on.
    pub source: String,
}

impl SentimentFactor {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        description: impl Into<String>,
        impact: f64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            description: description.into(),
            impact: clamp_signed(impact),
            source: source.into(),
        }
    }
}

/// Explanation attached to an aggregate score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub factors: Vec<SentimentFactor>,
    pub summary: String,
}

/// Polarity estimate with confidence and emotion weights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScore {
    /// In `[-1.0, 1.0]`, negative to positive.
    pub score: f64,
    /// In `[0.0, 1.0]`.
    pub confidence: f64,
    pub emotions: BTreeMap<Emotion, f64>,
    pub breakdown: SentimentBreakdown,
}

impl SentimentScore {
    /// Builds a score with an empty breakdown, clamping `score` to `[-1, 1]`
    /// and `confidence` to `[0, 1]`. NaN inputs collapse to 0.
    #[must_use]
    pub fn new(score: f64, confidence: f64, emotions: BTreeMap<Emotion, f64>) -> Self {
        Self {
            score: clamp_signed(score),
            confidence: clamp_unit(confidence),
            emotions,
            breakdown: SentimentBreakdown::default(),
        }
    }

    /// Zero score, zero confidence, no emotions.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_breakdown(mut self, breakdown: SentimentBreakdown) -> Self {
        self.breakdown = breakdown;
        self
    }
}

/// Aggregate sentiment snapshot for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalSentiment {
    pub location: GeoPoint,
    pub overall: SentimentScore,
    /// Only platforms that contributed at least one scored post.
    pub per_platform: BTreeMap<Platform, SentimentScore>,
    pub total_posts: usize,
    pub timestamp: DateTime<Utc>,
}

impl LocalSentiment {
    /// All-zero snapshot used when no posts were scored.
    #[must_use]
    pub fn empty(location: GeoPoint) -> Self {
        Self {
            location,
            overall: SentimentScore::neutral(),
            per_platform: BTreeMap::new(),
            total_posts: 0,
            timestamp: Utc::now(),
        }
    }
}

fn clamp_signed(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
