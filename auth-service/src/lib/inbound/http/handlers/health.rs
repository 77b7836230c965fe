use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::inbound::http::router::AppState;

pub const SERVICE_NAME: &str = "auth-service";

/// Liveness probe that also re-runs the default account bootstrap.
pub async fn health(State(state): State<AppState>) -> Response {
    match state.auth_service.bootstrap_default_account().await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                service: SERVICE_NAME,
                message: outcome.message(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Default account bootstrap failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error",
                    service: SERVICE_NAME,
                    message: "default account bootstrap failed",
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub message: &'static str,
}
