//! Update categorization: a small TF-IDF + multinomial naive Bayes model
//! bootstrapped from one exemplar sentence per category.

pub mod error;
pub mod exemplars;
pub mod model;
pub mod service;
pub mod text;

pub use error::ClassifierError;
pub use exemplars::EXEMPLARS;
pub use model::TextModel;
pub use service::{ClassifierService, ModelSource, Prediction, FALLBACK_PREDICTION};
