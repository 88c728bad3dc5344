use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::ScheduleRequest;
use super::optimizer::{SchedulingError, ShiftOptimizer};

/// Router builder exposing the optimization endpoints.
pub fn schedule_router(optimizer: Arc<ShiftOptimizer>) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/schedule/optimize", post(optimize_handler))
        .route("/api/schedule/greedy", post(greedy_handler))
        .with_state(optimizer)
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

pub(crate) async fn optimize_handler(
    State(optimizer): State<Arc<ShiftOptimizer>>,
    Json(request): Json<ScheduleRequest>,
) -> Response {
    match optimizer.optimize(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => scheduling_error_response(err),
    }
}

pub(crate) async fn greedy_handler(
    State(optimizer): State<Arc<ShiftOptimizer>>,
    Json(request): Json<ScheduleRequest>,
) -> Response {
    match optimizer.plan_greedy(&request) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => scheduling_error_response(err),
    }
}

/// Maps pipeline failures onto HTTP responses. Solver faults are reported
/// generically; their detail only goes to the log.
pub fn scheduling_error_response(err: SchedulingError) -> Response {
    match err {
        SchedulingError::Validation(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        SchedulingError::Infeasible(result) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(*result)).into_response()
        }
        SchedulingError::Timeout { deadline } => {
            let payload = json!({
                "status": "timeout",
                "error": format!("solver did not finish within {}s", deadline.as_secs_f64()),
            });
            (StatusCode::GATEWAY_TIMEOUT, Json(payload)).into_response()
        }
        SchedulingError::Solver(error) => {
            error!(error = %error, "schedule optimization failed");
            let payload = json!({
                "error": "internal solver failure",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
