//! Sponsor risk scoring pipeline.
//!
//! A validated [`CaseRecord`] is encoded by the normalizer, aligned to the
//! model's feature schema, scored by the trained regressor (or the baseline
//! when no model is available), adjusted by the ordered rule blend using the
//! case's [`RiskFactors`], and finally classified into a [`RiskTier`].

pub mod blend;
pub mod domain;
mod engine;
pub mod model;
pub mod normalizer;
pub mod schema;
pub mod tier;

#[cfg(test)]
mod tests;

pub use blend::{BlendConfig, BlendOutcome, ScoreAdjustment};
pub use domain::{
    BatchCase, CaseEnvelope, CaseRecord, CaseSubmission, EvaluationRequest, RawValue,
    RiskFactorSubmission, RiskFactors, SystemChecks, ValidationError,
};
pub use engine::{
    BatchSummary, CaseAssessment, RiskAssessment, RiskScoringEngine, ScoreOrigin, BASELINE_SCORE,
};
pub use model::{ModelAvailability, ModelError, ModelStatusView, RiskModel, TreeEnsemble};
pub use schema::{FeatureVector, SchemaSource, FALLBACK_FEATURE_NAMES, FALLBACK_SCHEMA_VERSION};
pub use tier::{RiskTier, TierThresholds, CANONICAL_TIER_THRESHOLDS};
