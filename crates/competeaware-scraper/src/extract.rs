//! Heuristic update extraction from raw HTML.
//!
//! Two passes: first look for repeated post-like containers, and only if none
//! of them qualify take one large content region of the page.

use chrono::{DateTime, Utc};
use competeaware_core::CandidateUpdate;
use scraper::{ElementRef, Html, Selector};

/// Title used when the page has no non-empty `<title>`.
pub const NO_TITLE: &str = "No title";

const POST_SELECTORS: [&str; 5] = ["article", ".post", ".blog-post", ".news-item", ".update"];
const POST_MATCH_LIMIT: usize = 5;
const POST_MIN_CHARS: usize = 30;

const REGION_SELECTORS: [&str; 4] = ["main", ".main-content", "#content", "body"];
const REGION_MIN_CHARS: usize = 100;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Extracts candidate updates from `html`.
///
/// Every candidate carries `competitor_id`, the page title, `url`, and
/// `detected_at`, with content capped by [`CandidateUpdate::from_website`].
/// Returns an empty vector when nothing qualifies.
#[must_use]
pub fn extract_candidates(
    html: &str,
    competitor_id: i64,
    url: &str,
    detected_at: DateTime<Utc>,
) -> Vec<CandidateUpdate> {
    let document = Html::parse_document(html);
    let title = page_title(&document);

    let mut texts = post_texts(&document);
    if texts.is_empty() {
        texts.extend(region_text(&document));
    }

    texts
        .iter()
        .map(|text| CandidateUpdate::from_website(competitor_id, &title, text, url, detected_at))
        .collect()
}

fn page_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return NO_TITLE.to_string();
    };

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// First pass: top matches of every post-like selector, in selector order.
fn post_texts(document: &Html) -> Vec<String> {
    let mut texts = Vec::new();

    for selector_str in POST_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector).take(POST_MATCH_LIMIT) {
                let text = visible_text(element);
                if text.chars().count() > POST_MIN_CHARS {
                    texts.push(text);
                }
            }
        }
    }

    texts
}

/// Second pass: the first region selector that matches decides the outcome,
/// whether or not its text is long enough.
fn region_text(document: &Html) -> Option<String> {
    for selector_str in REGION_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = visible_text(element);
            return (text.chars().count() > REGION_MIN_CHARS).then_some(text);
        }
    }

    None
}

/// Text nodes under `element` that are not inside a hidden element, each
/// trimmed, joined with single spaces.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
