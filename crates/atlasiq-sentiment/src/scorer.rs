//! Per-text and per-post scoring.
//!
//! A text score blends a base polarity model (weight 0.7) with keyword-set
//! lexicon counts (weight 0.3). A post score then amplifies the text score
//! by an engagement level derived from likes, comments and shares.

use std::collections::BTreeMap;
use std::sync::Arc;

use atlasiq_core::{Emotion, Post, SentimentScore};

use crate::lexicon::{classify, tokenize, KeywordClass, EMOTION_KEYWORDS};
use crate::model::{PolarityModel, WeightedLexiconModel};
use crate::preprocess::TextPreprocessor;

const BASE_WEIGHT: f64 = 0.7;
const LEXICON_WEIGHT: f64 = 0.3;

/// Confidence assigned to the base model whenever it produces output.
const BASE_CONFIDENCE: f64 = 0.8;

/// Extra confidence per unit of engagement level.
const ENGAGEMENT_CONFIDENCE_BOOST: f64 = 0.2;

/// Scores texts and posts with a pluggable base [`PolarityModel`].
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn PolarityModel>,
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer").finish_non_exhaustive()
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(Arc::new(WeightedLexiconModel))
    }
}

impl SentimentScorer {
    #[must_use]
    pub fn new(model: Arc<dyn PolarityModel>) -> Self {
        Self { model }
    }

    /// Scores raw text. The returned breakdown is always empty.
    #[must_use]
    pub fn score_text(&self, text: &str) -> SentimentScore {
        let cleaned = TextPreprocessor::clean(text);
        let tokens = tokenize(&cleaned);

        let (base, base_confidence) = match self.model.polarity(&cleaned) {
            Some(polarity) => (polarity.clamp(-1.0, 1.0), BASE_CONFIDENCE),
            None => (0.0, 0.0),
        };
        let lexicon = LexiconScore::from_tokens(&tokens);

        SentimentScore::new(
            BASE_WEIGHT * base + LEXICON_WEIGHT * lexicon.score,
            BASE_WEIGHT * base_confidence + LEXICON_WEIGHT * lexicon.confidence,
            detect_emotions(&tokens),
        )
    }

    /// Scores a post's text, then amplifies score and confidence by its
    /// engagement level. Posts without text score as empty text.
    #[must_use]
    pub fn score_post(&self, post: &Post) -> SentimentScore {
        let text = self.score_text(post.text.as_deref().unwrap_or_default());
        let level = engagement_level(post.engagement.weighted_total());

        SentimentScore::new(
            text.score * (1.0 + level),
            (text.confidence + ENGAGEMENT_CONFIDENCE_BOOST * level).min(1.0),
            text.emotions,
        )
    }
}

/// Maps a weighted engagement total (`likes + 2·comments + 3·shares`) to an
/// amplification level in `[0.0, 0.7]`.
#[must_use]
pub fn engagement_level(weighted_total: u64) -> f64 {
    match weighted_total {
        0 => 0.0,
        1..=9 => 0.1,
        10..=49 => 0.3,
        50..=99 => 0.5,
        _ => 0.7,
    }
}

/// Keyword-set polarity over whole tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LexiconScore {
    score: f64,
    confidence: f64,
}

impl LexiconScore {
    #[allow(clippy::cast_precision_loss)]
    fn from_tokens(tokens: &[String]) -> Self {
        let (mut positive, mut negative, mut neutral) = (0_usize, 0_usize, 0_usize);
        for token in tokens {
            match classify(token) {
                Some(KeywordClass::Positive) => positive += 1,
                Some(KeywordClass::Negative) => negative += 1,
                Some(KeywordClass::Neutral) => neutral += 1,
                None => {}
            }
        }

        let matched = positive + negative + neutral;
        let score = if matched == 0 {
            0.0
        } else {
            (positive as f64 - negative as f64) / matched as f64
        };
        let confidence = if tokens.is_empty() {
            0.0
        } else {
            matched as f64 / tokens.len() as f64
        };

        Self { score, confidence }
    }
}

/// Cue hits per token for each label. Every cue found inside a token counts
/// once, so a token holding two cues of one label counts twice. Labels with
/// no hits are left out.
#[allow(clippy::cast_precision_loss)]
fn detect_emotions(tokens: &[String]) -> BTreeMap<Emotion, f64> {
    if tokens.is_empty() {
        return BTreeMap::new();
    }
    let total = tokens.len() as f64;

    EMOTION_KEYWORDS
        .iter()
        .filter_map(|(emotion, cues)| {
            let hits: usize = tokens
                .iter()
                .map(|token| cues.iter().filter(|cue| token.contains(**cue)).count())
                .sum();
            (hits > 0).then_some((*emotion, hits as f64 / total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use atlasiq_core::{Engagement, Platform};
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;

    const EPS: f64 = 1e-9;

    fn post(text: Option<&str>, likes: u64, comments: u64, shares: u64) -> Post {
        Post {
            platform: Platform::Facebook,
            id: "p".to_owned(),
            text: text.map(str::to_owned),
            timestamp: Utc::now(),
            location: None,
            engagement: Engagement {
                likes,
                comments,
                shares,
            },
        }
    }

    /// Fixed-output model for isolating the lexicon arithmetic.
    struct Constant(Option<f64>);

    impl PolarityModel for Constant {
        fn polarity(&self, _text: &str) -> Option<f64> {
            self.0
        }
    }

    #[test]
    fn neighborhood_scenario_is_lexicon_positive() {
        let text = "I love this amazing neighborhood! #blessed";
        let tokens = tokenize(&TextPreprocessor::clean(text));
        assert_eq!(tokens.len(), 5);

        let lexicon = LexiconScore::from_tokens(&tokens);
        assert!((lexicon.score - 1.0).abs() < EPS);
        assert!((lexicon.confidence - 0.4).abs() < EPS);

        let scored = SentimentScorer::default().score_text(text);
        assert!(scored.score > 0.0);
        // base: love 0.5 + amazing 0.5 = 1.0
        assert!((scored.score - 1.0).abs() < EPS, "score {}", scored.score);
        assert!((scored.confidence - 0.68).abs() < EPS, "conf {}", scored.confidence);
        assert!(scored.breakdown.factors.is_empty());
    }

    #[test]
    fn blend_uses_seventy_thirty_weights() {
        let scorer = SentimentScorer::new(Arc::new(Constant(Some(-0.5))));
        // lexicon: "good" positive, "bad" negative, "fine" neutral -> 0/3
        let scored = scorer.score_text("good bad fine day");
        assert!((scored.score - (-0.35)).abs() < EPS);
        assert!((scored.confidence - (0.56 + 0.3 * 0.75)).abs() < EPS);
    }

    #[test]
    fn silent_model_contributes_nothing() {
        let scorer = SentimentScorer::new(Arc::new(Constant(None)));
        let scored = scorer.score_text("terrible");
        assert!((scored.score - (-0.3)).abs() < EPS);
        assert!((scored.confidence - 0.3).abs() < EPS);
    }

    #[test]
    fn punctuated_tokens_miss_the_keyword_sets() {
        let scorer = SentimentScorer::new(Arc::new(Constant(None)));
        let scored = scorer.score_text("Bad!!! service ...");
        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.confidence, 0.0);
    }

    #[test]
    fn punctuation_tokens_count_toward_emotion_fractions() {
        let scorer = SentimentScorer::new(Arc::new(Constant(None)));
        let scored = scorer.score_text("so sad ... !!!");
        assert!((scored.emotions[&Emotion::Sadness] - 0.25).abs() < EPS);
    }

    #[test]
    fn empty_text_is_neutral() {
        let scored = SentimentScorer::default().score_text("   #tag @user ");
        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.confidence, 0.0);
        assert!(scored.emotions.is_empty());
    }

    #[test]
    fn emotions_are_token_fractions_by_substring() {
        let scored = SentimentScorer::default().score_text("so happy and excited but worried");
        assert!((scored.emotions[&Emotion::Joy] - 2.0 / 6.0).abs() < EPS);
        assert!((scored.emotions[&Emotion::Fear] - 1.0 / 6.0).abs() < EPS);
        assert!(!scored.emotions.contains_key(&Emotion::Anger));
    }

    #[test]
    fn emotion_cues_match_inside_longer_tokens() {
        let scored = SentimentScorer::default().score_text("unhappy crowd");
        assert!(scored.emotions.contains_key(&Emotion::Joy));
    }

    #[test]
    fn each_cue_inside_a_token_counts() {
        let scored = SentimentScorer::default().score_text("gloomy-down day");
        // "gloomy" and "down" both sit in the first of two tokens
        assert!((scored.emotions[&Emotion::Sadness] - 1.0).abs() < EPS);
    }

    #[test]
    fn engagement_level_thresholds() {
        assert_eq!(engagement_level(0), 0.0);
        assert_eq!(engagement_level(1), 0.1);
        assert_eq!(engagement_level(9), 0.1);
        assert_eq!(engagement_level(10), 0.3);
        assert_eq!(engagement_level(49), 0.3);
        assert_eq!(engagement_level(50), 0.5);
        assert_eq!(engagement_level(99), 0.5);
        assert_eq!(engagement_level(100), 0.7);
        assert_eq!(engagement_level(u64::MAX), 0.7);
    }

    #[test]
    fn zero_engagement_leaves_text_score_unchanged() {
        let scorer = SentimentScorer::default();
        let text = scorer.score_text("great day");
        let scored = scorer.score_post(&post(Some("great day"), 0, 0, 0));
        assert_eq!(scored, text);
    }

    #[test]
    fn higher_engagement_never_lowers_a_positive_score() {
        let scorer = SentimentScorer::default();
        let engagements = [(0, 0, 0), (3, 0, 0), (5, 5, 1), (40, 5, 0), (200, 30, 10)];
        let scores: Vec<SentimentScore> = engagements
            .iter()
            .map(|&(l, c, s)| scorer.score_post(&post(Some("great day"), l, c, s)))
            .collect();

        assert!(scores[0].score > 0.0);
        for pair in scores.windows(2) {
            assert!(pair[1].score >= pair[0].score);
            assert!(pair[1].confidence >= pair[0].confidence);
        }
        // 0.58 * 1.7
        assert!((scores[4].score - 0.986).abs() < EPS);
        assert!((scores[4].confidence - 0.85).abs() < EPS);
    }

    #[test]
    fn amplified_scores_stay_in_range() {
        let scorer = SentimentScorer::default();
        let texts = [
            "terrible awful horrible worst hate",
            "love amazing perfect best excellent",
            "",
            "okay",
        ];
        for text in texts {
            let scored = scorer.score_post(&post(Some(text), 1_000, 1_000, 1_000));
            assert!((-1.0..=1.0).contains(&scored.score), "{text}: {}", scored.score);
            assert!((0.0..=1.0).contains(&scored.confidence));
        }
    }

    #[test]
    fn post_without_text_scores_as_empty() {
        let scored = SentimentScorer::default().score_post(&post(None, 500, 0, 0));
        assert_eq!(scored.score, 0.0);
        // Engagement still lifts confidence.
        assert!((scored.confidence - 0.14).abs() < EPS);
    }

    fn any_post_text() -> impl Strategy<Value = String> {
        prop_oneof![
            any::<String>(),
            "[a-zA-Z!.#@ ]{0,24}( (love|great|terrible|sad|okay|happy|worried))*",
        ]
    }

    proptest! {
        #[test]
        fn score_and_confidence_stay_in_range(
            text in any_post_text(),
            likes in 0_u64..10_000,
            comments in 0_u64..10_000,
            shares in 0_u64..10_000,
        ) {
            let scored = SentimentScorer::default()
                .score_post(&post(Some(text.as_str()), likes, comments, shares));
            prop_assert!((-1.0..=1.0).contains(&scored.score));
            prop_assert!((0.0..=1.0).contains(&scored.confidence));
            prop_assert!(scored.emotions.values().all(|w| *w >= 0.0));
        }

        #[test]
        fn more_engagement_never_lowers_a_non_negative_score(
            text in any_post_text(),
            low in (0_u64..500, 0_u64..500, 0_u64..500),
            extra in (0_u64..500, 0_u64..500, 0_u64..500),
        ) {
            let scorer = SentimentScorer::default();
            prop_assume!(scorer.score_text(&text).score >= 0.0);

            let (l, c, s) = low;
            let (el, ec, es) = extra;
            let before = scorer.score_post(&post(Some(text.as_str()), l, c, s));
            let after = scorer.score_post(&post(Some(text.as_str()), l + el, c + ec, s + es));
            prop_assert!(after.score >= before.score);
            prop_assert!(after.confidence >= before.confidence);
        }
    }
}
