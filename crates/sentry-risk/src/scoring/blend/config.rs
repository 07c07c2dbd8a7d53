use serde::{Deserialize, Serialize};

/// How prior denials move the running score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum DenialRule {
    /// Replace the running score, discarding earlier accumulation.
    Overwrite(f64),
    /// Add a fixed amount per recorded denial.
    PerDenial(f64),
}

/// Additive weights for failed verification checks and watch-list hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCheckWeights {
    pub duplicate_flag: u8,
    pub high_trafficking_area: u8,
    pub sponsor_registration_failed: u8,
    pub fingerprint_check_failed: u8,
    pub vetting_failed: u8,
    pub ice_hit: u8,
    pub cbp_hit: u8,
    pub uac_portal_failed: u8,
    pub identity_access_failed: u8,
    pub atims_failed: u8,
}

impl SystemCheckWeights {
    pub const STANDARD: Self = Self {
        duplicate_flag: 5,
        high_trafficking_area: 20,
        sponsor_registration_failed: 10,
        fingerprint_check_failed: 10,
        vetting_failed: 10,
        ice_hit: 15,
        cbp_hit: 10,
        uac_portal_failed: 8,
        identity_access_failed: 5,
        atims_failed: 5,
    };
}

/// Constants driving the ordered rule blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendConfig {
    pub sponsorship_increment: f64,
    pub denial_rule: DenialRule,
    pub youth_age_min: u32,
    pub youth_age_max: u32,
    /// Ages strictly above this receive the age multiplier.
    pub senior_age_threshold: u32,
    pub age_multiplier: f64,
    pub criminal_history_multiplier: f64,
    pub trafficking_triad_score: u8,
    pub known_route_score: f64,
    pub network_affiliation_score: f64,
    pub prior_trafficking_score: f64,
    pub duplicate_bonus: u8,
    pub system_checks: SystemCheckWeights,
}

impl BlendConfig {
    /// Blend used by the single-record assessment path.
    pub const CANONICAL: Self = Self {
        sponsorship_increment: 5.0,
        denial_rule: DenialRule::Overwrite(87.0),
        youth_age_min: 18,
        youth_age_max: 28,
        senior_age_threshold: 75,
        age_multiplier: 1.2,
        criminal_history_multiplier: 1.5,
        trafficking_triad_score: 98,
        known_route_score: 87.0,
        network_affiliation_score: 89.0,
        prior_trafficking_score: 92.0,
        duplicate_bonus: 20,
        system_checks: SystemCheckWeights::STANDARD,
    };

    /// Earlier intake variant with per-item sponsorship and denial increments.
    /// Kept for side-by-side comparison; the engine never selects it implicitly.
    pub const LEGACY_INTAKE: Self = Self {
        sponsorship_increment: 7.0,
        denial_rule: DenialRule::PerDenial(10.0),
        ..Self::CANONICAL
    };

    pub(crate) fn age_multiplier_applies(&self, age: u32) -> bool {
        (self.youth_age_min..=self.youth_age_max).contains(&age) || age > self.senior_age_threshold
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self::CANONICAL
    }
}
