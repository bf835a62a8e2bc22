//! Scrape → dedup → persist → categorize orchestration.

pub mod categorize;
pub mod dedup;
pub mod error;
pub mod orchestrator;
pub mod persist;
pub mod summary;

pub use categorize::{categorize_updates, CategorizeSummary, MIN_CLASSIFIABLE_CHARS};
pub use dedup::{DedupStrategy, SubstringWindowDedup};
pub use error::PipelineError;
pub use orchestrator::Pipeline;
pub use persist::{save_updates, PersistSummary};
pub use summary::{CompetitorReport, ReportStatus, RunSummary};
