use std::sync::{Arc, Mutex};

use crate::scoring::domain::{CaseRecord, RiskFactors};
use crate::scoring::model::{ModelAvailability, ModelError, RiskModel};
use crate::scoring::schema::FeatureVector;
use crate::scoring::RiskScoringEngine;

/// Model returning a fixed score and remembering the vectors it saw.
#[derive(Debug)]
pub(super) struct FixedModel {
    pub(super) score: f64,
    pub(super) names: Option<Vec<String>>,
    pub(super) schema_version: Option<String>,
    pub(super) seen: Mutex<Vec<Vec<f64>>>,
}

impl FixedModel {
    pub(super) fn new(score: f64) -> Self {
        Self {
            score,
            names: None,
            schema_version: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn with_names(score: f64, names: &[&str]) -> Self {
        Self {
            names: Some(names.iter().map(|name| name.to_string()).collect()),
            ..Self::new(score)
        }
    }

    pub(super) fn last_vector(&self) -> Option<Vec<f64>> {
        self.seen.lock().expect("seen mutex poisoned").last().cloned()
    }

    pub(super) fn calls(&self) -> usize {
        self.seen.lock().expect("seen mutex poisoned").len()
    }
}

impl RiskModel for FixedModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        self.seen
            .lock()
            .expect("seen mutex poisoned")
            .push(features.values().to_vec());
        Ok(self.score)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }
}

pub(super) fn engine_with(model: Arc<FixedModel>) -> RiskScoringEngine {
    RiskScoringEngine::new(ModelAvailability::loaded(model, "fixed-model"))
}

pub(super) fn engine_scoring(score: f64) -> RiskScoringEngine {
    engine_with(Arc::new(FixedModel::new(score)))
}

pub(super) fn offline_engine() -> RiskScoringEngine {
    RiskScoringEngine::new(ModelAvailability::unavailable("artifact missing"))
}

/// Adult sponsor outside both age brackets with no risk signals.
pub(super) fn quiet_factors() -> RiskFactors {
    RiskFactors {
        sponsor_age: Some(30),
        ..RiskFactors::default()
    }
}

pub(super) fn sample_record() -> CaseRecord {
    CaseRecord {
        age: Some(15),
        gender: Some("M".to_string()),
        country_of_origin: Some("Honduras".to_string()),
        family_ties_status: Some("Verified".to_string()),
        financial_status: Some("Low".to_string()),
        ..CaseRecord::default()
    }
}
