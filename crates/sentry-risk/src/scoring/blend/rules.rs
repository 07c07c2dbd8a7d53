use super::config::{BlendConfig, DenialRule};
use super::{AdjustmentEffect, BaseScore, BlendRule, ScoreAdjustment, MAX_SCORE};
use crate::scoring::domain::RiskFactors;

/// Running score plus the trail of steps that moved it.
struct Ledger<'a> {
    running: f64,
    trail: &'a mut Vec<ScoreAdjustment>,
}

impl<'a> Ledger<'a> {
    fn new(start: f64, trail: &'a mut Vec<ScoreAdjustment>) -> Self {
        Self {
            running: start,
            trail,
        }
    }

    fn add(&mut self, rule: BlendRule, amount: f64) {
        self.running += amount;
        self.record(rule, AdjustmentEffect::Add(amount));
    }

    fn multiply(&mut self, rule: BlendRule, factor: f64) {
        self.running *= factor;
        self.record(rule, AdjustmentEffect::Multiply(factor));
    }

    fn overwrite(&mut self, rule: BlendRule, value: f64) {
        self.running = value;
        self.record(rule, AdjustmentEffect::Overwrite(value));
    }

    fn record(&mut self, rule: BlendRule, effect: AdjustmentEffect) {
        self.trail.push(ScoreAdjustment {
            rule,
            effect,
            score_after: self.running,
        });
    }

    /// Truncate toward zero, then cap.
    fn finish(self) -> u8 {
        self.running.trunc().min(f64::from(MAX_SCORE)) as u8
    }
}

/// Apply the ordered rule sequence. Later rules overwrite earlier
/// accumulation, so the order here is load-bearing.
pub(super) fn apply_rules(
    base: &BaseScore,
    factors: &RiskFactors,
    config: &BlendConfig,
    trail: &mut Vec<ScoreAdjustment>,
) -> u8 {
    let start = if base.from_model {
        base.value.clamp(0.0, f64::from(MAX_SCORE))
    } else {
        base.value
    };
    let mut ledger = Ledger::new(base.value, trail);
    if start != base.value {
        ledger.overwrite(BlendRule::ModelClamp, start);
    }

    if factors.past_sponsorships > 0 {
        ledger.add(
            BlendRule::PastSponsorships,
            f64::from(factors.past_sponsorships) * config.sponsorship_increment,
        );
    }

    if factors.past_denials > 0 {
        match config.denial_rule {
            DenialRule::Overwrite(value) => ledger.overwrite(BlendRule::PastDenials, value),
            DenialRule::PerDenial(step) => {
                ledger.add(BlendRule::PastDenials, f64::from(factors.past_denials) * step)
            }
        }
    }

    if factors
        .sponsor_age
        .is_some_and(|age| config.age_multiplier_applies(age))
    {
        ledger.multiply(BlendRule::AgeBracket, config.age_multiplier);
    }

    if factors.criminal_history {
        ledger.multiply(BlendRule::CriminalHistory, config.criminal_history_multiplier);
    }

    if factors.known_trafficking_route
        && factors.network_affiliation
        && factors.prior_trafficking_history
    {
        let triad = config.trafficking_triad_score;
        ledger.running = f64::from(triad);
        ledger.record(
            BlendRule::TraffickingTriad,
            AdjustmentEffect::ShortCircuit(f64::from(triad)),
        );
        return triad.min(MAX_SCORE);
    }

    // Sequential overwrites: when several are set the last one wins.
    if factors.known_trafficking_route {
        ledger.overwrite(BlendRule::KnownRoute, config.known_route_score);
    }
    if factors.network_affiliation {
        ledger.overwrite(BlendRule::NetworkAffiliation, config.network_affiliation_score);
    }
    if factors.prior_trafficking_history {
        ledger.overwrite(BlendRule::PriorTrafficking, config.prior_trafficking_score);
    }

    ledger.finish()
}
