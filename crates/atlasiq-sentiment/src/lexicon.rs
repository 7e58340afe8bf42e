//! Keyword lists for lexicon polarity and emotion detection.

use atlasiq_core::Emotion;

pub(crate) const POSITIVE: &[&str] = &[
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "awesome",
    "love",
    "like",
    "enjoy",
    "happy",
    "pleased",
    "satisfied",
    "good",
    "best",
    "perfect",
    "outstanding",
    "brilliant",
    "superb",
    "marvelous",
];

pub(crate) const NEGATIVE: &[&str] = &[
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "hate",
    "dislike",
    "angry",
    "frustrated",
    "disappointed",
    "sad",
    "bad",
    "worst",
    "annoying",
    "irritating",
    "frustrating",
    "upset",
    "mad",
    "furious",
];

pub(crate) const NEUTRAL: &[&str] = &[
    "okay",
    "fine",
    "average",
    "normal",
    "regular",
    "standard",
    "acceptable",
    "decent",
    "fair",
    "moderate",
    "typical",
];

/// Substring cues per emotion label.
pub(crate) const EMOTION_KEYWORDS: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &["happy", "joyful", "excited", "thrilled", "delighted", "cheerful"],
    ),
    (
        Emotion::Sadness,
        &["sad", "depressed", "down", "melancholy", "gloomy", "sorrowful"],
    ),
    (
        Emotion::Anger,
        &["angry", "mad", "furious", "rage", "irritated", "annoyed"],
    ),
    (
        Emotion::Fear,
        &["scared", "afraid", "terrified", "worried", "anxious", "nervous"],
    ),
    (
        Emotion::Surprise,
        &["surprised", "shocked", "amazed", "astonished", "stunned"],
    ),
    (
        Emotion::Disgust,
        &["disgusted", "revolted", "sickened", "repulsed", "appalled"],
    ),
];

/// Which keyword set a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeywordClass {
    Positive,
    Negative,
    Neutral,
}

pub(crate) fn classify(token: &str) -> Option<KeywordClass> {
    if POSITIVE.contains(&token) {
        Some(KeywordClass::Positive)
    } else if NEGATIVE.contains(&token) {
        Some(KeywordClass::Negative)
    } else if NEUTRAL.contains(&token) {
        Some(KeywordClass::Neutral)
    } else {
        None
    }
}

/// Lowercased whitespace tokens, punctuation kept.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Lowercased words with non-alphanumeric edges trimmed.
/// Words that are pure punctuation are dropped.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect()
}
