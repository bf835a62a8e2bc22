use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model artifact I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("training corpus is empty or has no usable tokens")]
    EmptyCorpus,

    #[error("input has no tokens known to the model")]
    NoFeatures,
}
