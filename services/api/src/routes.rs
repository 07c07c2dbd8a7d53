use crate::infra::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use sentry_risk::error::AppError;
use sentry_risk::intake;
use sentry_risk::scoring::{
    BatchCase, BatchSummary, CaseAssessment, EvaluationRequest, ModelStatusView, RiskAssessment,
    RiskScoringEngine,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
pub(crate) struct BatchResponse {
    pub(crate) results: Vec<CaseAssessment>,
    pub(crate) summary: BatchSummary,
}

pub(crate) fn risk_router(engine: Arc<RiskScoringEngine>) -> Router {
    Router::new()
        .route("/api/v1/model", get(model_status_handler))
        .route("/api/v1/risk/score", post(score_handler))
        .route("/api/v1/risk/batch", post(batch_handler))
        .with_state(engine)
}

pub(crate) fn with_risk_routes(engine: Arc<RiskScoringEngine>) -> Router {
    risk_router(engine)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn model_status_handler(
    State(engine): State<Arc<RiskScoringEngine>>,
) -> Json<ModelStatusView> {
    Json(engine.model_status())
}

pub(crate) async fn score_handler(
    State(engine): State<Arc<RiskScoringEngine>>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<RiskAssessment>, AppError> {
    let Json(request) = payload?;
    let assessment = engine.assess(&request)?;
    Ok(Json(assessment))
}

pub(crate) async fn batch_handler(
    State(engine): State<Arc<RiskScoringEngine>>,
    payload: Result<Json<Vec<BatchCase>>, JsonRejection>,
) -> Result<Json<BatchResponse>, AppError> {
    let Json(cases) = payload?;
    let cases = intake::validate_batch(&cases)?;
    let results = engine.evaluate_batch(&cases);
    let summary = BatchSummary::from_results(&results);

    info!(
        total = summary.total,
        high = summary.high,
        medium = summary.medium,
        low = summary.low,
        "batch scored"
    );

    Ok(Json(BatchResponse { results, summary }))
}
