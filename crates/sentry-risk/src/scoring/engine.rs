use serde::Serialize;
use tracing::{debug, warn};

use super::blend::{blend, BaseScore, BlendConfig, ScoreAdjustment};
use super::domain::{CaseEnvelope, CaseRecord, EvaluationRequest, RiskFactors, ValidationError};
use super::model::{invoke, ModelAvailability, ModelStatusView};
use super::normalizer::normalize;
use super::schema::{reconcile_for_model, SchemaSource};
use super::tier::{RiskTier, TierThresholds, CANONICAL_TIER_THRESHOLDS};

/// Raw score used in place of the model when it cannot produce one.
pub const BASELINE_SCORE: f64 = 30.0;

/// Where the pre-blend score came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "source")]
pub enum ScoreOrigin {
    Model {
        schema: SchemaSource,
    },
    Baseline {
        reason: String,
    },
}

/// Published result of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub tier: RiskTier,
    /// Caseworker guidance for the tier.
    pub recommendation: &'static str,
    pub model_loaded: bool,
    pub origin: ScoreOrigin,
    /// Model output or baseline before any clamping.
    pub raw_score: f64,
    /// Score after the ordered rules, before additive stages.
    pub blended_score: u8,
    pub degraded_schema: bool,
    pub adjustments: Vec<ScoreAdjustment>,
}

/// Assessment paired with the caller's case identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseAssessment {
    pub case_id: String,
    pub assessment: RiskAssessment,
}

/// Stateless pipeline over a model loaded once at startup.
#[derive(Debug, Clone)]
pub struct RiskScoringEngine {
    model: ModelAvailability,
    blend: BlendConfig,
    tiers: TierThresholds,
}

impl RiskScoringEngine {
    pub fn new(model: ModelAvailability) -> Self {
        Self::with_config(model, BlendConfig::CANONICAL, CANONICAL_TIER_THRESHOLDS)
    }

    pub fn with_config(model: ModelAvailability, blend: BlendConfig, tiers: TierThresholds) -> Self {
        Self {
            model,
            blend,
            tiers,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    pub fn model_status(&self) -> ModelStatusView {
        self.model.status()
    }

    pub fn tier_thresholds(&self) -> &TierThresholds {
        &self.tiers
    }

    /// Validate a raw request and evaluate it.
    pub fn assess(&self, request: &EvaluationRequest) -> Result<RiskAssessment, ValidationError> {
        let (record, factors) = request.validate()?;
        Ok(self.evaluate(&record, &factors))
    }

    pub fn evaluate(&self, record: &CaseRecord, factors: &RiskFactors) -> RiskAssessment {
        let (base, origin) = self.base_score(record);
        let outcome = blend(&base, factors, &self.blend);
        let tier = self.tiers.classify(outcome.score);

        debug!(
            score = outcome.score,
            blended_score = outcome.blended_score,
            tier = tier.label(),
            model_loaded = self.model.is_loaded(),
            "risk assessment computed"
        );

        RiskAssessment {
            score: outcome.score,
            tier,
            recommendation: tier.recommendation(),
            model_loaded: self.model.is_loaded(),
            degraded_schema: matches!(
                origin,
                ScoreOrigin::Model {
                    schema: SchemaSource::Fallback
                }
            ),
            origin,
            raw_score: base.value,
            blended_score: outcome.blended_score,
            adjustments: outcome.adjustments,
        }
    }

    /// Evaluate each case independently, preserving input order.
    pub fn evaluate_batch(&self, cases: &[CaseEnvelope]) -> Vec<CaseAssessment> {
        cases
            .iter()
            .map(|case| CaseAssessment {
                case_id: case.case_id.clone(),
                assessment: self.evaluate(&case.record, &case.risk_factors),
            })
            .collect()
    }

    fn base_score(&self, record: &CaseRecord) -> (BaseScore, ScoreOrigin) {
        let Some(model) = self.model.model() else {
            return (
                BaseScore::baseline(BASELINE_SCORE),
                ScoreOrigin::Baseline {
                    reason: "model unavailable".to_string(),
                },
            );
        };

        let normalized = normalize(record);
        let reconciled = reconcile_for_model(&normalized, model);
        match invoke(model, &reconciled.vector) {
            Ok(raw) => (
                BaseScore::model(raw),
                ScoreOrigin::Model {
                    schema: reconciled.source,
                },
            ),
            Err(err) => {
                warn!(error = %err, "model invocation failed; using baseline score");
                (
                    BaseScore::baseline(BASELINE_SCORE),
                    ScoreOrigin::Baseline {
                        reason: err.to_string(),
                    },
                )
            }
        }
    }
}

/// Tier counts and mean score across a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub mean_score: Option<f64>,
}

impl BatchSummary {
    pub fn from_results(results: &[CaseAssessment]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results {
            match result.assessment.tier {
                RiskTier::High => summary.high += 1,
                RiskTier::Medium => summary.medium += 1,
                RiskTier::Low => summary.low += 1,
            }
        }

        if !results.is_empty() {
            let total: u32 = results
                .iter()
                .map(|result| u32::from(result.assessment.score))
                .sum();
            summary.mean_score = Some(f64::from(total) / results.len() as f64);
        }

        summary
    }
}
