use serde::{Deserialize, Serialize};

/// Discrete risk classification derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW RISK",
            RiskTier::Medium => "MEDIUM RISK",
            RiskTier::High => "HIGH RISK",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            RiskTier::High => "Manual review required before proceeding",
            RiskTier::Medium => "Additional verification recommended",
            RiskTier::Low => "Processing can proceed with standard protocols",
        }
    }
}

/// Lower bound of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "bound", content = "score")]
pub enum TierBound {
    AtLeast(u8),
    Above(u8),
}

impl TierBound {
    const fn admits(self, score: u8) -> bool {
        match self {
            TierBound::AtLeast(bound) => score >= bound,
            TierBound::Above(bound) => score > bound,
        }
    }
}

/// Non-overlapping thresholds mapping a score onto a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub high: TierBound,
    pub medium: TierBound,
}

impl TierThresholds {
    /// Summary/table view: HIGH >= 70, MEDIUM >= 40, LOW below.
    pub const SUMMARY_TABLE: Self = Self {
        high: TierBound::AtLeast(70),
        medium: TierBound::AtLeast(40),
    };

    /// Single-record view: HIGH > 85, MEDIUM > 60, LOW otherwise.
    pub const SINGLE_RECORD_TABLE: Self = Self {
        high: TierBound::Above(85),
        medium: TierBound::Above(60),
    };

    pub const fn classify(&self, score: u8) -> RiskTier {
        if self.high.admits(score) {
            RiskTier::High
        } else if self.medium.admits(score) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        CANONICAL_TIER_THRESHOLDS
    }
}

/// Thresholds the scoring engine classifies with.
pub const CANONICAL_TIER_THRESHOLDS: TierThresholds = TierThresholds::SUMMARY_TABLE;
