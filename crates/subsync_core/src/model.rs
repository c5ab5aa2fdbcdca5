//! Trained speech-detection model.
//!
//! Inference is deliberately decoupled from any training library: a trained
//! model is nothing but a coefficient vector, a bias and a training-time
//! sync bias, and prediction needs only a dot product and an exponential.
//! Training itself is an external offline process; this module only loads
//! its output.
//!
//! The on-disk layout is JSON:
//!
//! ```json
//! {"logistic_regression": {"coef": [...], "bias": -1.0}, "bias": 0.05}
//! ```
//!
//! where the outer `bias` is the global sync-bias correction in seconds.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or applying a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Failed to read or write the model file.
    #[error("model file error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed model record.
    #[error("model format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Feature width does not match the trained coefficient vector.
    #[error("feature width {actual} does not match model width {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Logistic-regression coefficients for per-frame speech detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Positional coefficients matching the augmented feature layout.
    #[serde(rename = "coef")]
    pub coefficients: Vec<f64>,
    /// Intercept.
    pub bias: f64,
}

impl LogisticRegression {
    /// Probability of speech for one augmented feature vector.
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        let logit: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.bias;
        sigmoid(logit)
    }
}

/// Immutable trained model, loaded once per run and freely shareable across
/// workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechModel {
    /// Speech-detection classifier.
    pub logistic_regression: LogisticRegression,
    /// Global shift correction in seconds, baked in at training time and
    /// added to any estimated shift.
    #[serde(rename = "bias")]
    pub sync_bias: f64,
}

impl SpeechModel {
    /// Deserialize a model from its JSON representation.
    pub fn from_json(data: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Serialize the model to JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load a model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Save the model to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        Ok(fs::write(path, self.to_json()?)?)
    }

    /// Per-frame speech probabilities for a matrix of augmented features.
    ///
    /// Stateless and side-effect free; fails only when the feature width
    /// does not match the coefficient vector.
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let expected = self.logistic_regression.coefficients.len();
        for row in features {
            if row.len() != expected {
                return Err(ModelError::DimensionMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }

        Ok(features
            .iter()
            .map(|row| self.logistic_regression.predict_one(row))
            .collect())
    }
}

/// Logistic function `1 / (1 + exp(-a))`.
fn sigmoid(a: f64) -> f64 {
    1.0 / (1.0 + (-a).exp())
}
