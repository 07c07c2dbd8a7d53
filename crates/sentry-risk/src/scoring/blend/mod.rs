//! Ordered rule adjustments layered on top of the model's raw score.

mod config;
mod rules;
mod stages;

pub use config::{BlendConfig, DenialRule, SystemCheckWeights};

use serde::{Deserialize, Serialize};

use super::domain::RiskFactors;

/// Upper bound of every published score.
pub const MAX_SCORE: u8 = 100;

/// Starting point of the blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseScore {
    pub value: f64,
    /// Model output is clamped into range before any rule runs.
    pub from_model: bool,
}

impl BaseScore {
    pub fn model(raw: f64) -> Self {
        Self {
            value: raw,
            from_model: true,
        }
    }

    pub fn baseline(value: f64) -> Self {
        Self {
            value,
            from_model: false,
        }
    }
}

/// Rule that produced an entry in the adjustment trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendRule {
    ModelClamp,
    PastSponsorships,
    PastDenials,
    AgeBracket,
    CriminalHistory,
    TraffickingTriad,
    KnownRoute,
    NetworkAffiliation,
    PriorTrafficking,
    DuplicateRecords,
    DuplicateFlag,
    HighTraffickingArea,
    SponsorRegistration,
    FingerprintCheck,
    Vetting,
    IceHit,
    CbpHit,
    UacPortal,
    IdentityAccess,
    Atims,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "amount")]
pub enum AdjustmentEffect {
    Add(f64),
    Multiply(f64),
    Overwrite(f64),
    /// Final value returned without running later rules.
    ShortCircuit(f64),
}

/// One applied step, kept so an assessment can be audited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub rule: BlendRule,
    pub effect: AdjustmentEffect,
    pub score_after: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendOutcome {
    /// Score after the ordered rule sequence, before the additive stages.
    pub blended_score: u8,
    /// Score after the duplicate bonus and system checks.
    pub score: u8,
    pub adjustments: Vec<ScoreAdjustment>,
}

/// Run the full blend: ordered rules, then the duplicate bonus, then system
/// checks, each additive stage recapped at [`MAX_SCORE`].
pub fn blend(base: &BaseScore, factors: &RiskFactors, config: &BlendConfig) -> BlendOutcome {
    let mut adjustments = Vec::new();
    let blended_score = rules::apply_rules(base, factors, config, &mut adjustments);

    let mut score = stages::apply_duplicate_bonus(
        blended_score,
        factors.duplicate_matches,
        config,
        &mut adjustments,
    );
    if let Some(checks) = &factors.system_checks {
        score =
            stages::apply_system_checks(score, checks, &config.system_checks, &mut adjustments);
    }

    BlendOutcome {
        blended_score,
        score,
        adjustments,
    }
}
