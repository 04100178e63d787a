use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::auth::AdminSession;

use super::error::ApiError;
use crate::infra::http::AdminState;

/// Authenticated session attached to gated requests.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    pub token: String,
    pub session: AdminSession,
}

pub async fn require_session(
    State(state): State<AdminState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(value) => value,
        None => return ApiError::unauthorized().into_response(),
    };

    let session = match state.auth.authenticate(&token) {
        Ok(session) => session,
        Err(err) => return ApiError::from(err).into_response(),
    };

    request
        .extensions_mut()
        .insert(AdminPrincipal { token, session });

    next.run(request).await
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let bearer = raw.strip_prefix("Bearer ")?;
    Some(bearer.to_string())
}
