//! Polite single-page HTTP fetcher.

use std::time::Duration;

use chrono::Utc;
use competeaware_core::{AppConfig, CandidateUpdate, Competitor};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::extract::extract_candidates;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client that waits a random interval before every request.
///
/// One request per call; no retries. Every non-2xx status is an error.
#[derive(Debug, Clone)]
pub struct SiteFetcher {
    client: Client,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl SiteFetcher {
    /// Creates a fetcher with the given request timeout, `User-Agent`, and
    /// pre-request delay bounds (inclusive, milliseconds).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        min_delay_ms: u64,
        max_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs.max(1))))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms,
        })
    }

    /// Builds a fetcher from the scraper settings in [`AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_min_delay_ms,
            config.scraper_max_delay_ms,
        )
    }

    /// Sleeps for the jitter delay, then GETs `url` and returns the body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` is not an absolute http(s) URL.
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] on timeout, DNS, connect, or body read failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = parse_http_url(url)?;
        self.pause().await;

        let response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    fn next_delay(&self) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random_range(self.min_delay_ms..=self.max_delay_ms))
    }

    async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

fn parse_http_url(url: &str) -> Result<Url, ScraperError> {
    let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ScraperError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Per-competitor scrape
// ---------------------------------------------------------------------------

/// Result of scraping one competitor website.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Found(Vec<CandidateUpdate>),
    /// The page loaded but nothing qualified as an update.
    Empty,
    Failed {
        reason: String,
    },
}

impl ScrapeOutcome {
    /// Short status label used in run reports.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            ScrapeOutcome::Found(_) => "found",
            ScrapeOutcome::Empty => "empty",
            ScrapeOutcome::Failed { .. } => "failed",
        }
    }
}

/// Fetches `url` for `competitor` and extracts candidate updates.
///
/// Never returns an error: fetch failures are logged at `warn` and reported
/// as [`ScrapeOutcome::Failed`].
pub async fn scrape_competitor(
    fetcher: &SiteFetcher,
    competitor: &Competitor,
    url: &str,
) -> ScrapeOutcome {
    let html = match fetcher.fetch_page(url).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(
                competitor = %competitor.name,
                competitor_id = competitor.id,
                url,
                error = %e,
                "scraper: fetch failed"
            );
            return ScrapeOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let candidates = extract_candidates(&html, competitor.id, url, Utc::now());
    tracing::info!(
        competitor = %competitor.name,
        competitor_id = competitor.id,
        candidates = candidates.len(),
        "scraper: extracted candidates"
    );

    if candidates.is_empty() {
        ScrapeOutcome::Empty
    } else {
        ScrapeOutcome::Found(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_http_url_accepts_http_and_https() {
        assert!(parse_http_url("http://example.com").is_ok());
        assert!(parse_http_url("https://example.com/news").is_ok());
    }

    #[test]
    fn parse_http_url_rejects_other_schemes_and_garbage() {
        assert!(matches!(
            parse_http_url("ftp://example.com"),
            Err(ScraperError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_http_url("not a url"),
            Err(ScraperError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn next_delay_stays_within_bounds() {
        let fetcher = SiteFetcher::new(5, "test", 10, 20).unwrap();
        for _ in 0..50 {
            let delay = fetcher.next_delay();
            assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(20));
        }
    }

    #[test]
    fn zero_delay_skips_sleep() {
        let fetcher = SiteFetcher::new(5, "test", 0, 0).unwrap();
        assert_eq!(fetcher.next_delay(), Duration::ZERO);
    }

    #[test]
    fn outcome_status_labels() {
        assert_eq!(ScrapeOutcome::Empty.status(), "empty");
        assert_eq!(ScrapeOutcome::Found(Vec::new()).status(), "found");
        assert_eq!(
            ScrapeOutcome::Failed {
                reason: "boom".to_string()
            }
            .status(),
            "failed"
        );
    }
}
