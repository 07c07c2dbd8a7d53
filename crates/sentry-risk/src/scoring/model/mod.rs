//! Trained regressor capability and the startup availability probe.

mod ensemble;

pub use ensemble::{Node, Tree, TreeEnsemble, ENSEMBLE_FORMAT_VERSION};

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::schema::FeatureVector;

/// Capabilities the pipeline needs from a trained model artifact.
pub trait RiskModel: Send + Sync + fmt::Debug {
    /// Raw, unbounded score for a vector aligned to the model's schema.
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;

    /// Ordered feature names the model was trained on, if it recorded them.
    fn feature_names(&self) -> Option<&[String]>;

    fn schema_version(&self) -> Option<&str> {
        None
    }
}

/// Failures while loading or invoking a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model format version {version}")]
    UnsupportedFormat { version: u32 },
    #[error("tree {tree} node {node} is invalid: {reason}")]
    InvalidNode {
        tree: usize,
        node: usize,
        reason: String,
    },
    #[error("tree {tree} node {node} reads feature {feature} outside schema width {width}")]
    FeatureOutOfRange {
        tree: usize,
        node: usize,
        feature: usize,
        width: usize,
    },
    #[error("feature vector has {actual} values but the model expects {expected}")]
    WidthMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite score")]
    NonFiniteOutput,
}

/// Result of probing for the model artifact at startup.
///
/// The pipeline checks this flag instead of treating a load failure as a signal.
#[derive(Debug, Clone)]
pub enum ModelAvailability {
    Loaded {
        model: Arc<dyn RiskModel>,
        source: String,
    },
    Unavailable {
        reason: String,
    },
}

impl ModelAvailability {
    /// Load the artifact at `path`, degrading to `Unavailable` on any failure.
    pub fn probe(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!("no model artifact configured; scoring will use the baseline");
            return Self::Unavailable {
                reason: "no model artifact configured".to_string(),
            };
        };

        match TreeEnsemble::from_path(path) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    trees = model.trees().len(),
                    declares_features = model.feature_names().is_some(),
                    "model artifact loaded"
                );
                Self::Loaded {
                    model: Arc::new(model),
                    source: path.display().to_string(),
                }
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "model artifact unavailable; scoring will use the baseline");
                Self::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn loaded(model: Arc<dyn RiskModel>, source: impl Into<String>) -> Self {
        Self::Loaded {
            model,
            source: source.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn model(&self) -> Option<&dyn RiskModel> {
        match self {
            Self::Loaded { model, .. } => Some(model.as_ref()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn status(&self) -> ModelStatusView {
        match self {
            Self::Loaded { model, source } => ModelStatusView {
                model_loaded: true,
                source: Some(source.clone()),
                feature_names: model.feature_names().map(<[String]>::to_vec),
                schema_version: model.schema_version().map(str::to_string),
                unavailable_reason: None,
            },
            Self::Unavailable { reason } => ModelStatusView {
                model_loaded: false,
                source: None,
                feature_names: None,
                schema_version: None,
                unavailable_reason: Some(reason.clone()),
            },
        }
    }
}

/// Serializable view of the loaded model for status endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatusView {
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

/// Run the model over an aligned vector and reject non-finite output.
pub fn invoke(model: &dyn RiskModel, features: &FeatureVector) -> Result<f64, ModelError> {
    if let Some(names) = model.feature_names() {
        if names.len() != features.len() {
            return Err(ModelError::WidthMismatch {
                expected: names.len(),
                actual: features.len(),
            });
        }
    }

    let score = model.predict(features)?;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(ModelError::NonFiniteOutput)
    }
}
