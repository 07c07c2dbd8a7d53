use std::path::Path;

use sentry_risk::scoring::{
    CaseRecord, EvaluationRequest, ModelAvailability, RiskFactors, RiskScoringEngine, RiskTier,
    ScoreOrigin, SchemaSource, ValidationError,
};

fn fixture_engine() -> RiskScoringEngine {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sar_model.json");
    let availability = ModelAvailability::probe(Some(path.as_path()));
    assert!(availability.is_loaded(), "fixture model should load");
    RiskScoringEngine::new(availability)
}

fn adult_sponsor() -> RiskFactors {
    RiskFactors {
        sponsor_age: Some(34),
        ..RiskFactors::default()
    }
}

fn flagged_child() -> CaseRecord {
    CaseRecord {
        age: Some(12),
        gender: Some("F".to_string()),
        country_of_origin: Some("Guatemala".to_string()),
        criminal_history: true,
        past_denials: 1,
        ..CaseRecord::default()
    }
}

#[test]
fn model_score_of_fifty_without_signals_is_medium() {
    let assessment = fixture_engine().evaluate(&flagged_child(), &adult_sponsor());

    assert!(assessment.model_loaded);
    assert_eq!(assessment.raw_score, 50.0);
    assert_eq!(assessment.score, 50);
    assert_eq!(assessment.tier, RiskTier::Medium);
    assert_eq!(
        assessment.origin,
        ScoreOrigin::Model {
            schema: SchemaSource::Model
        }
    );
}

#[test]
fn quiet_case_scores_low() {
    let record = CaseRecord {
        age: Some(16),
        ..CaseRecord::default()
    };

    let assessment = fixture_engine().evaluate(&record, &adult_sponsor());

    assert_eq!(assessment.raw_score, 18.0);
    assert_eq!(assessment.tier, RiskTier::Low);
}

#[test]
fn trafficking_triad_dominates_the_model() {
    let factors = RiskFactors {
        known_trafficking_route: true,
        network_affiliation: true,
        prior_trafficking_history: true,
        ..adult_sponsor()
    };

    let assessment = fixture_engine().evaluate(&CaseRecord::default(), &factors);

    assert_eq!(assessment.score, 98);
    assert_eq!(assessment.tier, RiskTier::High);
}

#[test]
fn denial_and_sponsorship_history_resolve_to_denial_score() {
    let factors = RiskFactors {
        past_sponsorships: 3,
        past_denials: 1,
        ..adult_sponsor()
    };

    let assessment = fixture_engine().evaluate(&CaseRecord::default(), &factors);

    assert_eq!(assessment.score, 87);
    assert_eq!(assessment.tier, RiskTier::High);
}

#[test]
fn engine_without_model_uses_baseline() {
    let engine = RiskScoringEngine::new(ModelAvailability::probe(None));

    let assessment = engine.evaluate(&flagged_child(), &adult_sponsor());

    assert!(!assessment.model_loaded);
    assert_eq!(assessment.score, 30);
    assert_eq!(assessment.tier, RiskTier::Low);
}

#[test]
fn json_requests_accept_original_column_names() {
    let request: EvaluationRequest = serde_json::from_value(serde_json::json!({
        "record": {
            "Age": 12,
            "Gender": "Male",
            "Criminal_History": "Yes",
            "Past_Denials": "1",
            "indicators": { "Multiple_ICE_Investigations": true }
        },
        "risk_factors": {
            "sponsor_age": 34,
            "duplicate_matches": 2
        }
    }))
    .expect("request deserializes");

    let assessment = fixture_engine().assess(&request).expect("valid request");

    // 20 + 15 + 12 + 3 + 10 from the model, then the duplicate bonus.
    assert_eq!(assessment.raw_score, 60.0);
    assert_eq!(assessment.blended_score, 60);
    assert_eq!(assessment.score, 80);
    assert_eq!(assessment.tier, RiskTier::High);
}

#[test]
fn json_requests_reject_negative_counts() {
    let request: EvaluationRequest = serde_json::from_value(serde_json::json!({
        "risk_factors": { "past_sponsorships": -2 }
    }))
    .expect("request deserializes");

    let err = fixture_engine().assess(&request).expect_err("negative count");

    assert_eq!(
        err,
        ValidationError::InvalidCount {
            field: "past_sponsorships",
            value: "-2".to_string(),
        }
    );
}

#[test]
fn assessments_serialize_with_audit_trail() {
    let factors = RiskFactors {
        criminal_history: true,
        ..adult_sponsor()
    };

    let assessment = fixture_engine().evaluate(&flagged_child(), &factors);
    let json = serde_json::to_value(&assessment).expect("assessment serializes");

    assert_eq!(json["tier"], "HIGH");
    assert_eq!(
        json["recommendation"],
        "Manual review required before proceeding"
    );
    assert_eq!(json["score"], 75);
    assert_eq!(json["origin"]["source"], "model");
    assert_eq!(json["adjustments"][0]["rule"], "criminal_history");
    assert_eq!(json["adjustments"][0]["effect"]["op"], "multiply");
}
