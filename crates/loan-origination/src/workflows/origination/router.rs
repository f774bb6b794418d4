use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use super::domain::RawApplication;
use super::service::{LoanOriginationService, PipelineStage};

/// Router builder exposing HTTP endpoints for application decisions.
pub fn origination_router(service: Arc<LoanOriginationService>) -> Router {
    Router::new()
        .route("/api/v1/loans/applications", post(submit_handler))
        .route("/api/v1/loans/model", get(model_handler))
        .with_state(service)
}

pub(crate) async fn submit_handler(
    State(service): State<Arc<LoanOriginationService>>,
    axum::Json(raw): axum::Json<RawApplication>,
) -> Response {
    let outcome = service.process(&raw);
    let status = match outcome.stage {
        PipelineStage::Validation => StatusCode::BAD_REQUEST,
        PipelineStage::Decision => StatusCode::OK,
    };
    (status, axum::Json(outcome.status_view())).into_response()
}

pub(crate) async fn model_handler(
    State(service): State<Arc<LoanOriginationService>>,
) -> Response {
    (StatusCode::OK, axum::Json(service.model_status())).into_response()
}
