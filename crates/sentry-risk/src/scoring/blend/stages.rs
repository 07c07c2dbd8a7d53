use super::config::{BlendConfig, SystemCheckWeights};
use super::{AdjustmentEffect, BlendRule, ScoreAdjustment, MAX_SCORE};
use crate::scoring::domain::SystemChecks;

/// More than one matching record adds a flat bonus.
pub(super) fn apply_duplicate_bonus(
    score: u8,
    duplicate_matches: u32,
    config: &BlendConfig,
    trail: &mut Vec<ScoreAdjustment>,
) -> u8 {
    if duplicate_matches > 1 {
        add_capped(score, BlendRule::DuplicateRecords, config.duplicate_bonus, trail)
    } else {
        score
    }
}

pub(super) fn apply_system_checks(
    score: u8,
    checks: &SystemChecks,
    weights: &SystemCheckWeights,
    trail: &mut Vec<ScoreAdjustment>,
) -> u8 {
    let findings = [
        (checks.is_duplicate, BlendRule::DuplicateFlag, weights.duplicate_flag),
        (
            checks.high_trafficking_area,
            BlendRule::HighTraffickingArea,
            weights.high_trafficking_area,
        ),
        (
            !checks.sponsor_registration_passed,
            BlendRule::SponsorRegistration,
            weights.sponsor_registration_failed,
        ),
        (
            !checks.fingerprint_check_passed,
            BlendRule::FingerprintCheck,
            weights.fingerprint_check_failed,
        ),
        (!checks.vetting_passed, BlendRule::Vetting, weights.vetting_failed),
        (checks.ice_hit, BlendRule::IceHit, weights.ice_hit),
        (checks.cbp_hit, BlendRule::CbpHit, weights.cbp_hit),
        (
            !checks.uac_portal_passed,
            BlendRule::UacPortal,
            weights.uac_portal_failed,
        ),
        (
            !checks.identity_access_passed,
            BlendRule::IdentityAccess,
            weights.identity_access_failed,
        ),
        (!checks.atims_passed, BlendRule::Atims, weights.atims_failed),
    ];

    findings
        .into_iter()
        .filter(|(raised, _, _)| *raised)
        .fold(score, |running, (_, rule, weight)| {
            add_capped(running, rule, weight, trail)
        })
}

fn add_capped(score: u8, rule: BlendRule, amount: u8, trail: &mut Vec<ScoreAdjustment>) -> u8 {
    let next = score.saturating_add(amount).min(MAX_SCORE);
    trail.push(ScoreAdjustment {
        rule,
        effect: AdjustmentEffect::Add(f64::from(amount)),
        score_after: f64::from(next),
    });
    next
}
