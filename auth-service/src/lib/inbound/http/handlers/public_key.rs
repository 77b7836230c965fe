use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use super::ApiError;
use crate::inbound::http::router::AppState;

pub const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// Serves the token verification key so other services can check tokens offline.
pub async fn public_key(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pem = state.auth_service.public_key_pem().await?;

    Ok(([(header::CONTENT_TYPE, PEM_CONTENT_TYPE)], pem))
}
