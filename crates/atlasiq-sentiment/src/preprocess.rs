//! Social-media text normalization applied before scoring.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("valid mention regex"));
static HASHTAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("valid hashtag regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strips URLs, `@mentions` and `#hashtags`, then collapses whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    /// Pure and idempotent: `clean(clean(x)) == clean(x)`.
    #[must_use]
    pub fn clean(text: &str) -> String {
        // Removed spans become a space so their neighbours never fuse into a
        // new match.
        let text = URL_RE.replace_all(text, " ");
        let text = MENTION_RE.replace_all(&text, " ");
        let text = HASHTAG_RE.replace_all(&text, " ");
        WHITESPACE_RE.replace_all(&text, " ").trim().to_owned()
    }
}
