//! Shared domain types, storage contract, and configuration for CompeteAware.

pub mod app_config;
pub mod competitors;
pub mod config;
pub mod store;
pub mod updates;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use competitors::{load_competitors, Competitor, CompetitorConfig, CompetitorsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use store::UpdateStore;
pub use updates::{
    truncate_chars, CandidateUpdate, Category, Classification, PendingUpdate, MAX_CONTENT_CHARS,
    PENDING_CATEGORY, WEBSITE_SOURCE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read competitors file {path}: {source}")]
    CompetitorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse competitors file: {0}")]
    CompetitorsFileParse(#[source] serde_yaml::Error),

    #[error("invalid competitors config: {0}")]
    Validation(String),
}
