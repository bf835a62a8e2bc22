//! Competitor update records as they move through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category stored on freshly scraped rows until the classifier runs.
pub const PENDING_CATEGORY: &str = "general";

/// Source tag for updates extracted from a competitor's website.
pub const WEBSITE_SOURCE: &str = "website";

/// Upper bound on stored update content, in characters.
pub const MAX_CONTENT_CHARS: usize = 500;

/// The fixed label set the classifier assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Pricing,
    Campaign,
    ProductRelease,
    Partnership,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Pricing,
        Category::Campaign,
        Category::ProductRelease,
        Category::Partnership,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pricing => "pricing",
            Category::Campaign => "campaign",
            Category::ProductRelease => "product_release",
            Category::Partnership => "partnership",
            Category::Other => "other",
        }
    }

    /// Parses a stored label. `general` and unknown labels return `None`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An extracted snippet that has not been persisted or classified yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateUpdate {
    pub competitor_id: i64,
    pub title: String,
    /// At most [`MAX_CONTENT_CHARS`] characters.
    pub content: String,
    pub category: String,
    pub source: String,
    pub url: String,
    pub detected_at: DateTime<Utc>,
}

impl CandidateUpdate {
    /// Builds a pending website candidate, truncating `content` to
    /// [`MAX_CONTENT_CHARS`] characters.
    #[must_use]
    pub fn from_website(
        competitor_id: i64,
        title: &str,
        content: &str,
        url: &str,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            competitor_id,
            title: title.to_string(),
            content: truncate_chars(content, MAX_CONTENT_CHARS),
            category: PENDING_CATEGORY.to_string(),
            source: WEBSITE_SOURCE.to_string(),
            url: url.to_string(),
            detected_at,
        }
    }
}

/// A stored update still waiting for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpdate {
    pub id: i64,
    pub content: Option<String>,
}

/// Classifier output to be written back onto a stored update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub update_id: i64,
    pub category: Category,
    /// Max class probability, in `[0, 1]`.
    pub confidence: f64,
}

/// Returns the first `max` characters of `s` (not bytes).
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
