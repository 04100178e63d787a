use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use super::error::ApiError;
use super::middleware::bearer_token;
use super::models::{SessionRequest, SessionResponse};
use crate::infra::http::AdminState;

pub async fn sign_in(
    State(state): State<AdminState>,
    Json(payload): Json<SessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = state.auth.sign_in(&payload.email, &payload.password)?;

    tracing::info!(target = "atelier::http::admin", email = %payload.email, "admin signed in");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

// The session endpoints authenticate inline: sign-in must stay reachable
// without a token, so this route cannot sit behind the session middleware.
pub async fn current_session(
    State(state): State<AdminState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
    let session = state.auth.authenticate(&token)?;

    Ok(Json(json!({
        "email": session.email,
        "signed_in_at": session.signed_in_at,
        "expires_at": session.expires_at,
    })))
}

pub async fn sign_out(
    State(state): State<AdminState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
    state.auth.authenticate(&token)?;
    state.auth.sign_out(&token);

    Ok(StatusCode::NO_CONTENT)
}
