use super::common::quiet_factors;
use crate::scoring::blend::{
    blend, AdjustmentEffect, BaseScore, BlendConfig, BlendRule, DenialRule,
};
use crate::scoring::domain::{RiskFactors, SystemChecks};

fn canonical(base: BaseScore, factors: &RiskFactors) -> (u8, u8) {
    let outcome = blend(&base, factors, &BlendConfig::CANONICAL);
    (outcome.blended_score, outcome.score)
}

#[test]
fn quiet_factors_leave_the_base_untouched() {
    let outcome = blend(&BaseScore::model(50.0), &quiet_factors(), &BlendConfig::CANONICAL);

    assert_eq!(outcome.blended_score, 50);
    assert_eq!(outcome.score, 50);
    assert!(outcome.adjustments.is_empty());
}

#[test]
fn trafficking_triad_short_circuits_everything_else() {
    let factors = RiskFactors {
        sponsor_age: Some(20),
        criminal_history: true,
        past_sponsorships: 4,
        past_denials: 2,
        known_trafficking_route: true,
        network_affiliation: true,
        prior_trafficking_history: true,
        ..RiskFactors::default()
    };

    for base in [0.0, 30.0, 250.0] {
        let (blended, _) = canonical(BaseScore::model(base), &factors);
        assert_eq!(blended, 98, "base {base}");
    }

    let outcome = blend(&BaseScore::model(10.0), &factors, &BlendConfig::CANONICAL);
    let last = outcome.adjustments.last().expect("triad recorded");
    assert_eq!(last.rule, BlendRule::TraffickingTriad);
    assert_eq!(last.effect, AdjustmentEffect::ShortCircuit(98.0));
}

#[test]
fn later_overwrites_win_over_earlier_ones() {
    let factors = RiskFactors {
        known_trafficking_route: true,
        prior_trafficking_history: true,
        ..quiet_factors()
    };

    let (blended, _) = canonical(BaseScore::model(40.0), &factors);

    assert_eq!(blended, 92);
}

#[test]
fn route_and_network_resolve_to_network_score() {
    let factors = RiskFactors {
        known_trafficking_route: true,
        network_affiliation: true,
        ..quiet_factors()
    };

    let (blended, _) = canonical(BaseScore::model(10.0), &factors);

    assert_eq!(blended, 89);
}

#[test]
fn known_route_alone_overwrites_to_87() {
    let factors = RiskFactors {
        known_trafficking_route: true,
        criminal_history: true,
        ..quiet_factors()
    };

    let (blended, _) = canonical(BaseScore::model(70.0), &factors);

    assert_eq!(blended, 87);
}

#[test]
fn denial_overwrite_discards_sponsorship_accumulation() {
    let factors = RiskFactors {
        past_sponsorships: 3,
        past_denials: 1,
        ..quiet_factors()
    };

    let outcome = blend(&BaseScore::model(60.0), &factors, &BlendConfig::CANONICAL);

    assert_eq!(outcome.blended_score, 87);
    let rules: Vec<_> = outcome
        .adjustments
        .iter()
        .map(|adjustment| (adjustment.rule, adjustment.score_after))
        .collect();
    assert_eq!(
        rules,
        vec![
            (BlendRule::PastSponsorships, 75.0),
            (BlendRule::PastDenials, 87.0)
        ]
    );
}

#[test]
fn multipliers_apply_after_the_denial_overwrite() {
    let factors = RiskFactors {
        sponsor_age: Some(22),
        past_denials: 1,
        ..RiskFactors::default()
    };

    // 87 * 1.2 = 104.4, truncated then capped.
    let (blended, _) = canonical(BaseScore::model(5.0), &factors);

    assert_eq!(blended, 100);
}

#[test]
fn age_and_criminal_multipliers_compound_then_truncate() {
    let factors = RiskFactors {
        sponsor_age: Some(80),
        criminal_history: true,
        ..RiskFactors::default()
    };

    // 33 * 1.2 * 1.5 = 59.4
    let (blended, _) = canonical(BaseScore::model(33.0), &factors);

    assert_eq!(blended, 59);
}

#[test]
fn missing_sponsor_age_skips_the_age_multiplier() {
    let factors = RiskFactors {
        sponsor_age: None,
        ..RiskFactors::default()
    };

    let (blended, _) = canonical(BaseScore::model(50.0), &factors);

    assert_eq!(blended, 50);
}

#[test]
fn model_output_is_clamped_before_rules() {
    let high = blend(&BaseScore::model(180.0), &quiet_factors(), &BlendConfig::CANONICAL);
    assert_eq!(high.blended_score, 100);
    assert_eq!(high.adjustments[0].rule, BlendRule::ModelClamp);

    let negative = blend(&BaseScore::model(-40.0), &quiet_factors(), &BlendConfig::CANONICAL);
    assert_eq!(negative.blended_score, 0);
}

#[test]
fn model_clamp_happens_before_sponsorship_increment() {
    let factors = RiskFactors {
        past_sponsorships: 2,
        ..quiet_factors()
    };

    // Clamped to 0 first, then +10.
    let (blended, _) = canonical(BaseScore::model(-55.0), &factors);

    assert_eq!(blended, 10);
}

#[test]
fn fractional_scores_truncate_toward_zero() {
    let (blended, _) = canonical(BaseScore::model(64.99), &quiet_factors());
    assert_eq!(blended, 64);
}

#[test]
fn duplicate_bonus_needs_more_than_one_match() {
    let single = RiskFactors {
        duplicate_matches: 1,
        ..quiet_factors()
    };
    let multiple = RiskFactors {
        duplicate_matches: 2,
        ..quiet_factors()
    };

    assert_eq!(canonical(BaseScore::model(50.0), &single), (50, 50));
    assert_eq!(canonical(BaseScore::model(50.0), &multiple), (50, 70));
}

#[test]
fn duplicate_bonus_is_recapped() {
    let factors = RiskFactors {
        duplicate_matches: 3,
        prior_trafficking_history: true,
        ..quiet_factors()
    };

    assert_eq!(canonical(BaseScore::model(0.0), &factors), (92, 100));
}

#[test]
fn triad_still_receives_the_duplicate_bonus() {
    let factors = RiskFactors {
        known_trafficking_route: true,
        network_affiliation: true,
        prior_trafficking_history: true,
        duplicate_matches: 2,
        ..quiet_factors()
    };

    assert_eq!(canonical(BaseScore::model(0.0), &factors), (98, 100));
}

#[test]
fn failed_system_checks_add_after_the_blend() {
    let factors = RiskFactors {
        system_checks: Some(SystemChecks {
            ice_hit: true,
            vetting_passed: false,
            ..SystemChecks::default()
        }),
        ..quiet_factors()
    };

    let outcome = blend(&BaseScore::baseline(30.0), &factors, &BlendConfig::CANONICAL);

    assert_eq!(outcome.blended_score, 30);
    assert_eq!(outcome.score, 55);
    let rules: Vec<_> = outcome.adjustments.iter().map(|a| a.rule).collect();
    assert_eq!(rules, vec![BlendRule::Vetting, BlendRule::IceHit]);
}

#[test]
fn passing_system_checks_change_nothing() {
    let factors = RiskFactors {
        system_checks: Some(SystemChecks::default()),
        ..quiet_factors()
    };

    assert_eq!(canonical(BaseScore::baseline(30.0), &factors), (30, 30));
}

#[test]
fn every_failed_check_saturates_at_the_cap() {
    let factors = RiskFactors {
        system_checks: Some(SystemChecks {
            is_duplicate: true,
            high_trafficking_area: true,
            sponsor_registration_passed: false,
            fingerprint_check_passed: false,
            vetting_passed: false,
            ice_hit: true,
            cbp_hit: true,
            uac_portal_passed: false,
            identity_access_passed: false,
            atims_passed: false,
        }),
        ..quiet_factors()
    };

    let outcome = blend(&BaseScore::baseline(30.0), &factors, &BlendConfig::CANONICAL);

    assert_eq!(outcome.score, 100);
    assert!(outcome
        .adjustments
        .iter()
        .all(|adjustment| adjustment.score_after <= 100.0));
}

#[test]
fn legacy_variant_accumulates_denials() {
    let factors = RiskFactors {
        past_sponsorships: 1,
        past_denials: 2,
        ..quiet_factors()
    };

    let outcome = blend(&BaseScore::model(40.0), &factors, &BlendConfig::LEGACY_INTAKE);

    assert_eq!(BlendConfig::LEGACY_INTAKE.denial_rule, DenialRule::PerDenial(10.0));
    assert_eq!(outcome.blended_score, 67);
}

#[test]
fn scores_stay_within_bounds_across_signal_combinations() {
    let bases = [-1_000.0, -0.5, 0.0, 17.3, 50.0, 99.9, 100.0, 1_000.0];
    for base in bases {
        for mask in 0u16..512 {
            let bit = |n: u16| mask & (1 << n) != 0;
            let factors = RiskFactors {
                sponsor_age: if bit(0) { Some(19) } else { Some(90) },
                criminal_history: bit(1),
                prior_trafficking_history: bit(2),
                network_affiliation: bit(3),
                known_trafficking_route: bit(4),
                past_sponsorships: if bit(5) { 5 } else { 0 },
                past_denials: if bit(6) { 3 } else { 0 },
                duplicate_matches: if bit(7) { 4 } else { 0 },
                system_checks: bit(8).then(|| SystemChecks {
                    ice_hit: true,
                    ..SystemChecks::default()
                }),
            };

            for from_model in [true, false] {
                let base_score = if from_model {
                    BaseScore::model(base)
                } else {
                    BaseScore::baseline(30.0)
                };
                let outcome = blend(&base_score, &factors, &BlendConfig::CANONICAL);
                assert!(outcome.blended_score <= 100);
                assert!(outcome.score <= 100);
                assert!(outcome.score >= outcome.blended_score);
                assert!(outcome
                    .adjustments
                    .iter()
                    .all(|adjustment| adjustment.score_after >= 0.0));
            }
        }
    }
}
