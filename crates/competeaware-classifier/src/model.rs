//! TF-IDF features feeding a multinomial naive Bayes classifier.
//!
//! Feature extraction follows the usual smoothed formulation: raw term counts
//! weighted by `ln((1 + n) / (1 + df)) + 1`, then L2-normalized per document.

use std::collections::{BTreeMap, BTreeSet};

use competeaware_core::Category;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::text::tokenize;

/// Additive (Laplace) smoothing for feature counts.
const ALPHA: f64 = 1.0;

/// A trained model. Serialized as the JSON classifier artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextModel {
    /// Term → feature column. Columns follow sorted term order.
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    pub classes: Vec<Category>,
    pub class_log_prior: Vec<f64>,
    /// `[class][feature]` log probabilities.
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl TextModel {
    /// Fits the vectorizer and the classifier on `(label, text)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::EmptyCorpus`] if no document has a token.
    pub fn train(corpus: &[(Category, &str)]) -> Result<Self, ClassifierError> {
        let tokenized: Vec<(Category, Vec<String>)> = corpus
            .iter()
            .map(|(category, text)| (*category, tokenize(text)))
            .collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|(_, tokens)| tokens.iter().map(String::as_str))
            .collect();
        if terms.is_empty() {
            return Err(ClassifierError::EmptyCorpus);
        }
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let idf = smoothed_idf(&vocabulary, &tokenized);

        let mut classes: Vec<Category> = tokenized.iter().map(|(c, _)| *c).collect();
        classes.sort();
        classes.dedup();

        let n_features = vocabulary.len();
        let mut feature_count = vec![vec![0.0_f64; n_features]; classes.len()];
        let mut class_count = vec![0.0_f64; classes.len()];

        for (category, tokens) in &tokenized {
            let Ok(class_idx) = classes.binary_search(category) else {
                continue;
            };
            class_count[class_idx] += 1.0;
            for (col, weight) in tfidf_row(&vocabulary, &idf, tokens) {
                feature_count[class_idx][col] += weight;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let n_docs = tokenized.len() as f64;
        let class_log_prior = class_count.iter().map(|c| (c / n_docs).ln()).collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|row| {
                #[allow(clippy::cast_precision_loss)]
                let total: f64 = row.iter().sum::<f64>() + ALPHA * n_features as f64;
                row.iter().map(|c| ((c + ALPHA) / total).ln()).collect()
            })
            .collect();

        Ok(Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Class probabilities for already-preprocessed `text`, in `classes` order.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::NoFeatures`] if no token of `text` is in
    /// the vocabulary (including empty input).
    pub fn predict_proba(&self, text: &str) -> Result<Vec<(Category, f64)>, ClassifierError> {
        let tokens = tokenize(text);
        let row = tfidf_row(&self.vocabulary, &self.idf, &tokens);
        if row.is_empty() {
            return Err(ClassifierError::NoFeatures);
        }

        let joint: Vec<f64> = self
            .feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(log_probs, prior)| {
                prior
                    + row
                        .iter()
                        .map(|(col, weight)| weight * log_probs[*col])
                        .sum::<f64>()
            })
            .collect();

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = joint.iter().map(|j| (j - max).exp()).collect();
        let norm: f64 = exp.iter().sum();

        Ok(self
            .classes
            .iter()
            .zip(exp)
            .map(|(category, e)| (*category, e / norm))
            .collect())
    }

    /// Most probable class and its probability.
    ///
    /// # Errors
    ///
    /// Same as [`TextModel::predict_proba`].
    pub fn predict(&self, text: &str) -> Result<(Category, f64), ClassifierError> {
        self.predict_proba(text)?
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(ClassifierError::NoFeatures)
    }

    /// Checks that the array shapes agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::InvalidModel`] describing the first mismatch.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let n_features = self.vocabulary.len();
        let n_classes = self.classes.len();

        if n_classes == 0 || n_features == 0 {
            return Err(ClassifierError::InvalidModel(
                "model has no classes or no vocabulary".to_string(),
            ));
        }
        if self.idf.len() != n_features {
            return Err(ClassifierError::InvalidModel(format!(
                "idf has {} entries for {n_features} features",
                self.idf.len()
            )));
        }
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(ClassifierError::InvalidModel(format!(
                "class arrays do not match {n_classes} classes"
            )));
        }
        if self.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(ClassifierError::InvalidModel(format!(
                "feature_log_prob rows must have {n_features} columns"
            )));
        }
        if self.vocabulary.values().any(|col| *col >= n_features) {
            return Err(ClassifierError::InvalidModel(
                "vocabulary index out of range".to_string(),
            ));
        }
        Ok(())
    }
}

fn smoothed_idf(
    vocabulary: &BTreeMap<String, usize>,
    tokenized: &[(Category, Vec<String>)],
) -> Vec<f64> {
    let mut df = vec![0.0_f64; vocabulary.len()];
    for (_, tokens) in tokenized {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            if let Some(col) = vocabulary.get(term) {
                df[*col] += 1.0;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = tokenized.len() as f64;
    df.iter()
        .map(|d| ((1.0 + n) / (1.0 + d)).ln() + 1.0)
        .collect()
}

/// Sparse L2-normalized TF-IDF row as `(column, weight)` pairs. Unknown
/// tokens are ignored; an empty result means no known tokens.
fn tfidf_row(
    vocabulary: &BTreeMap<String, usize>,
    idf: &[f64],
    tokens: &[String],
) -> Vec<(usize, f64)> {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for token in tokens {
        if let Some(col) = vocabulary.get(token) {
            *counts.entry(*col).or_insert(0.0) += 1.0;
        }
    }

    let mut row: Vec<(usize, f64)> = counts
        .into_iter()
        .map(|(col, tf)| (col, tf * idf[col]))
        .collect();

    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut row {
            *w /= norm;
        }
    }
    row
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
