//! Base polarity estimators.

use crate::lexicon::words;

/// A general-purpose polarity estimator feeding the scorer's base score.
pub trait PolarityModel: Send + Sync {
    /// Polarity in `[-1.0, 1.0]` for already-cleaned text, or `None` when the
    /// model has nothing to say about it.
    fn polarity(&self, text: &str) -> Option<f64>;
}

/// Word weights for everyday social-media language.
///
/// Keys are lowercase single words. Positive weights lie in `(0.0, 1.0]`,
/// negative ones in `[-1.0, 0.0)`.
const WEIGHTS: &[(&str, f64)] = &[
    // Positive
    ("good", 0.3),
    ("great", 0.4),
    ("nice", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("wonderful", 0.5),
    ("fantastic", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("lovely", 0.4),
    ("beautiful", 0.4),
    ("best", 0.5),
    ("happy", 0.4),
    ("fun", 0.3),
    ("friendly", 0.3),
    ("clean", 0.2),
    ("safe", 0.3),
    ("delicious", 0.4),
    ("recommend", 0.4),
    ("welcoming", 0.3),
    ("perfect", 0.5),
    ("enjoy", 0.3),
    ("enjoyed", 0.3),
    ("thanks", 0.2),
    // Negative
    ("bad", -0.4),
    ("poor", -0.3),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("horrible", -0.6),
    ("worst", -0.6),
    ("hate", -0.5),
    ("dirty", -0.4),
    ("dangerous", -0.6),
    ("unsafe", -0.5),
    ("crime", -0.5),
    ("rude", -0.4),
    ("noisy", -0.3),
    ("crowded", -0.2),
    ("traffic", -0.2),
    ("delay", -0.3),
    ("delayed", -0.3),
    ("closed", -0.2),
    ("broken", -0.4),
    ("angry", -0.4),
    ("sad", -0.4),
    ("disappointed", -0.4),
    ("disappointing", -0.4),
    ("expensive", -0.2),
    ("never", -0.2),
];

/// Sums per-word weights and clamps the total to `[-1.0, 1.0]`.
///
/// Produces a value for any text with at least one token, so unknown words
/// yield `Some(0.0)` rather than `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedLexiconModel;

impl PolarityModel for WeightedLexiconModel {
    fn polarity(&self, text: &str) -> Option<f64> {
        let tokens = words(text);
        if tokens.is_empty() {
            return None;
        }
        let total: f64 = tokens
            .iter()
            .filter_map(|token| {
                WEIGHTS
                    .iter()
                    .find(|(word, _)| *word == token.as_str())
                    .map(|&(_, weight)| weight)
            })
            .sum();
        Some(total.clamp(-1.0, 1.0))
    }
}
