use std::path::{Path, PathBuf};

use sentry_risk::scoring::{
    FeatureVector, ModelAvailability, ModelError, RiskModel, TreeEnsemble,
    FALLBACK_FEATURE_NAMES, FALLBACK_SCHEMA_VERSION,
};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sar_model.json")
}

#[test]
fn fallback_feature_list_matches_the_trained_artifact() {
    let model = TreeEnsemble::from_path(fixture_path()).expect("fixture loads");

    let declared = model.feature_names().expect("fixture declares feature names");
    assert_eq!(declared, FALLBACK_FEATURE_NAMES.as_slice());
    assert_eq!(model.schema_version(), Some(FALLBACK_SCHEMA_VERSION));
}

#[test]
fn probe_reports_a_loaded_model_with_its_schema() {
    let availability = ModelAvailability::probe(Some(fixture_path().as_path()));

    assert!(availability.is_loaded());
    let status = availability.status();
    assert!(status.model_loaded);
    assert_eq!(status.schema_version.as_deref(), Some(FALLBACK_SCHEMA_VERSION));
    assert_eq!(
        status.feature_names.map(|names| names.len()),
        Some(FALLBACK_FEATURE_NAMES.len())
    );
    assert_eq!(status.unavailable_reason, None);
}

#[test]
fn probe_never_fails_on_a_missing_artifact() {
    let availability = ModelAvailability::probe(Some(Path::new("./no-such-model.json")));

    assert!(!availability.is_loaded());
    let status = availability.status();
    assert!(!status.model_loaded);
    assert!(status.unavailable_reason.is_some());
}

#[test]
fn probe_without_a_configured_path_is_unavailable() {
    let availability = ModelAvailability::probe(None);

    assert!(!availability.is_loaded());
    assert!(availability.model().is_none());
}

#[test]
fn fixture_prediction_sums_base_and_leaves() {
    let model = TreeEnsemble::from_path(fixture_path()).expect("fixture loads");
    let mut values = vec![0.0; FALLBACK_FEATURE_NAMES.len()];
    values[0] = 12.0; // Age
    values[6] = 1.0; // Past_Denials
    values[8] = 1.0; // Criminal_History

    let score = model
        .predict(&FeatureVector::new(values))
        .expect("prediction succeeds");

    assert_eq!(score, 50.0);
}

#[test]
fn malformed_artifact_is_a_parse_error() {
    let err = TreeEnsemble::from_json("{\"format_version\": 1, \"trees\": ").expect_err("truncated");

    assert!(matches!(err, ModelError::Parse(_)));
}
