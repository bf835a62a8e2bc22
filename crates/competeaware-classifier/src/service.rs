//! Process-wide classifier handle with an explicit load/train lifecycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use competeaware_core::Category;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::ClassifierError;
use crate::exemplars::EXEMPLARS;
use crate::model::TextModel;
use crate::text::preprocess;

/// Answer returned whenever classification cannot produce a real prediction.
pub const FALLBACK_PREDICTION: Prediction = Prediction {
    category: Category::Other,
    confidence: 0.5,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub category: Category,
    /// Max class probability, in `[0, 1]`.
    pub confidence: f64,
}

/// Where the active model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// Already in memory; nothing was done.
    Cached,
    /// Read from the artifact on disk.
    Loaded,
    /// Trained from the exemplars because no artifact existed.
    Trained,
}

/// Owns the classifier model and its on-disk artifact.
///
/// The model is loaded lazily on first use (or eagerly via [`init`]) and can
/// be dropped again with [`unload`]. Shared across tasks behind an `Arc`.
///
/// [`init`]: ClassifierService::init
/// [`unload`]: ClassifierService::unload
#[derive(Debug)]
pub struct ClassifierService {
    model_path: PathBuf,
    model: RwLock<Option<Arc<TextModel>>>,
}

impl ClassifierService {
    #[must_use]
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            model: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub async fn is_loaded(&self) -> bool {
        self.model.read().await.is_some()
    }

    /// Makes a model available: loads the artifact if it exists, otherwise
    /// trains from the exemplars and persists the result. A failed write is
    /// logged and the in-memory model is used anyway.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError`] if an existing artifact cannot be read or
    /// parsed, or if bootstrap training fails.
    pub async fn init(&self) -> Result<ModelSource, ClassifierError> {
        self.ensure_loaded().await.map(|(_, source)| source)
    }

    /// Trains a fresh model from the exemplars, overwrites the artifact, and
    /// makes it the active model.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError`] if training or writing the artifact fails;
    /// the previous model stays active in that case.
    pub async fn retrain(&self) -> Result<(), ClassifierError> {
        let model = TextModel::train(&EXEMPLARS)?;
        save_model(&self.model_path, &model).await?;

        *self.model.write().await = Some(Arc::new(model));
        tracing::info!(path = %self.model_path.display(), "classifier: retrained model");
        Ok(())
    }

    /// Drops the in-memory model. The next call loads it again.
    pub async fn unload(&self) {
        *self.model.write().await = None;
    }

    /// Classifies `text`, surfacing every failure.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::NoFeatures`] when no token of the cleaned
    /// text is known to the model, or any model loading error.
    pub async fn classify(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let (model, _) = self.ensure_loaded().await?;
        let (category, confidence) = model.predict(&preprocess(text))?;
        Ok(Prediction {
            category,
            confidence,
        })
    }

    /// Classifies `text`, degrading to [`FALLBACK_PREDICTION`] on any failure.
    pub async fn predict_category(&self, text: &str) -> Prediction {
        match self.classify(text).await {
            Ok(prediction) => prediction,
            Err(ClassifierError::NoFeatures) => {
                tracing::debug!("classifier: no known tokens, using fallback");
                FALLBACK_PREDICTION
            }
            Err(e) => {
                tracing::warn!(error = %e, "classifier: prediction failed, using fallback");
                FALLBACK_PREDICTION
            }
        }
    }

    async fn ensure_loaded(&self) -> Result<(Arc<TextModel>, ModelSource), ClassifierError> {
        if let Some(model) = self.model.read().await.as_ref() {
            return Ok((Arc::clone(model), ModelSource::Cached));
        }

        let mut guard = self.model.write().await;
        // Another task may have loaded it while we waited for the write lock.
        if let Some(model) = guard.as_ref() {
            return Ok((Arc::clone(model), ModelSource::Cached));
        }

        let (model, source) = match load_model(&self.model_path).await? {
            Some(model) => {
                tracing::info!(path = %self.model_path.display(), "classifier: loaded model");
                (model, ModelSource::Loaded)
            }
            None => {
                let model = TextModel::train(&EXEMPLARS)?;
                if let Err(e) = save_model(&self.model_path, &model).await {
                    tracing::warn!(
                        path = %self.model_path.display(),
                        error = %e,
                        "classifier: could not persist bootstrap model, keeping it in memory"
                    );
                } else {
                    tracing::info!(
                        path = %self.model_path.display(),
                        "classifier: trained and saved bootstrap model"
                    );
                }
                (model, ModelSource::Trained)
            }
        };

        let model = Arc::new(model);
        *guard = Some(Arc::clone(&model));
        Ok((model, source))
    }
}

/// Reads the artifact at `path`. Returns `Ok(None)` if it does not exist.
async fn load_model(path: &Path) -> Result<Option<TextModel>, ClassifierError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ClassifierError::Io {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let model: TextModel = serde_json::from_str(&raw)?;
    model.validate()?;
    Ok(Some(model))
}

async fn save_model(path: &Path, model: &TextModel) -> Result<(), ClassifierError> {
    let json = serde_json::to_string_pretty(model)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ClassifierError::Io {
            path: path.display().to_string(),
            source: e,
        })
}
