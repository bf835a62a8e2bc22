use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub competitors_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Lower bound of the randomized pause before each fetch.
    pub scraper_min_delay_ms: u64,
    /// Upper bound (inclusive) of the randomized pause before each fetch.
    pub scraper_max_delay_ms: u64,
    /// Number of leading characters of a candidate used as the dedup needle.
    pub dedup_prefix_chars: usize,
    pub dedup_window_hours: i64,
    pub classifier_model_path: PathBuf,
    pub scrape_schedule_enabled: bool,
    pub scrape_initial_delay_secs: u64,
    pub scrape_interval_secs: u64,
    pub scrape_retry_cooldown_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("competitors_path", &self.competitors_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_min_delay_ms", &self.scraper_min_delay_ms)
            .field("scraper_max_delay_ms", &self.scraper_max_delay_ms)
            .field("dedup_prefix_chars", &self.dedup_prefix_chars)
            .field("dedup_window_hours", &self.dedup_window_hours)
            .field("classifier_model_path", &self.classifier_model_path)
            .field("scrape_schedule_enabled", &self.scrape_schedule_enabled)
            .field("scrape_initial_delay_secs", &self.scrape_initial_delay_secs)
            .field("scrape_interval_secs", &self.scrape_interval_secs)
            .field(
                "scrape_retry_cooldown_secs",
                &self.scrape_retry_cooldown_secs,
            )
            .finish()
    }
}
