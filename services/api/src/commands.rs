use crate::cli::{BatchArgs, DuplicateArgs, ModelArgs, ScoreArgs};
use crate::infra::{apply_model_override, build_engine};
use sentry_risk::config::AppConfig;
use sentry_risk::dedup::{self, DuplicateEvidence};
use sentry_risk::error::AppError;
use sentry_risk::intake;
use sentry_risk::scoring::{BatchSummary, EvaluationRequest, RiskScoringEngine};
use sentry_risk::telemetry;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let engine = engine_for(args.model)?;
    let raw = std::fs::read_to_string(&args.input)?;
    let request: EvaluationRequest = serde_json::from_str(&raw)?;

    let assessment = engine.assess(&request)?;
    print_json(&assessment)
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let engine = engine_for(args.model)?;
    let cases = intake::validate_batch(&intake::load_cases(&args.input)?)?;

    let results = engine.evaluate_batch(&cases);
    let summary = BatchSummary::from_results(&results);
    print_json(&json!({ "results": results, "summary": summary }))
}

pub(crate) fn run_model_status(args: ModelArgs) -> Result<(), AppError> {
    let engine = engine_for(args.model)?;
    print_json(&engine.model_status())
}

pub(crate) fn run_duplicates(args: DuplicateArgs) -> Result<(), AppError> {
    let config = load_config()?;
    let threshold = args
        .threshold
        .unwrap_or(config.scoring.duplicate_threshold);

    let roster = dedup::load_roster(&args.roster).map_err(intake::IntakeError::from)?;
    let Some(target) = roster.iter().find(|entry| entry.id == args.id) else {
        return print_json(&json!({
            "id": args.id,
            "found": false,
        }));
    };

    let known: Vec<&str> = roster
        .iter()
        .filter(|entry| entry.id != target.id)
        .map(|entry| entry.id.as_str())
        .collect();
    let fuzzy = dedup::find_fuzzy_duplicates(&target.id, &known, threshold);
    let fields = dedup::find_field_duplicates(target, &roster);
    let evidence = DuplicateEvidence::for_entry(target, &roster, threshold);

    print_json(&json!({
        "id": target.id,
        "found": true,
        "threshold": threshold,
        "fuzzy_matches": fuzzy,
        "field_matches": fields,
        "duplicate_matches": evidence.matches,
    }))
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn engine_for(model: Option<PathBuf>) -> Result<RiskScoringEngine, AppError> {
    let mut config = load_config()?;
    apply_model_override(&mut config.scoring, model);
    Ok(build_engine(&config.scoring))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
