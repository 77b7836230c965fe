use auth::VerificationReason;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::TokenCheck;
use crate::inbound::http::router::AppState;

pub async fn validate_token(
    State(state): State<AppState>,
    Json(body): Json<ValidateTokenRequestBody>,
) -> Result<ApiSuccess<ValidateTokenResponseData>, ApiError> {
    let token = body.token.trim();

    if token.is_empty() {
        return Err(ApiError::BadRequest("token is required".to_string()));
    }

    if !has_jwt_shape(token) {
        return Err(ApiError::BadRequest(
            "token must have three dot-separated segments".to_string(),
        ));
    }

    let check = state.auth_service.check_token(token).await;
    tracing::debug!(valid = check.is_valid(), "Token checked");

    Ok(ApiSuccess::new(StatusCode::OK, check.into()))
}

/// Compact JWS: three non-empty segments separated by dots.
fn has_jwt_shape(token: &str) -> bool {
    let segments: Vec<&str> = token.split('.').collect();
    segments.len() == 3 && segments.iter().all(|segment| !segment.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateTokenRequestBody {
    #[serde(default)]
    token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateTokenResponseData {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationReason>,
}

impl From<TokenCheck> for ValidateTokenResponseData {
    fn from(check: TokenCheck) -> Self {
        match check {
            TokenCheck::Valid { username } => Self {
                valid: true,
                user: Some(username),
                error: None,
            },
            TokenCheck::Invalid { reason } => Self {
                valid: false,
                user: None,
                error: Some(reason),
            },
        }
    }
}
