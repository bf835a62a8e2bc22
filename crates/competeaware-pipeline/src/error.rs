use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a scraping run is already in progress")]
    RunInProgress,

    #[error("storage error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Scraper(#[from] competeaware_scraper::ScraperError),
}

impl PipelineError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}
