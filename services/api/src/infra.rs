use metrics_exporter_prometheus::PrometheusHandle;
use sentry_risk::config::ScoringConfig;
use sentry_risk::scoring::{ModelAvailability, RiskScoringEngine};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Replace the configured artifact when `--model` was given.
pub(crate) fn apply_model_override(scoring: &mut ScoringConfig, model: Option<PathBuf>) {
    if let Some(path) = model {
        scoring.model_path = Some(path);
    }
}

/// Probe the model artifact once and wrap it in an engine.
pub(crate) fn build_engine(scoring: &ScoringConfig) -> RiskScoringEngine {
    RiskScoringEngine::new(ModelAvailability::probe(scoring.model_path.as_deref()))
}
