//! Text normalization and tokenization shared by training and prediction.

use std::sync::LazyLock;

use regex::Regex;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// Lowercases `text` and strips every character that is neither a word
/// character nor whitespace.
#[must_use]
pub fn preprocess(text: &str) -> String {
    PUNCTUATION_RE.replace_all(&text.to_lowercase(), "").into_owned()
}

/// Lowercase tokens of two or more word characters, in order.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
