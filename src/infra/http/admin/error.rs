//! JSON error envelope shared by both HTTP surfaces.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::auth::AuthError;
use crate::application::images::ImageError;
use crate::application::posts::PostError;
use crate::application::repos::{MediaStoreError, RepoError};

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const VALIDATION: &str = "validation";
    pub const GENERATION: &str = "generation_error";
    pub const MEDIA: &str = "media_error";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
        }
    }

    pub fn bad_request(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "authentication required",
            None,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                codes::INVALID_CREDENTIALS,
                "invalid credentials",
                None,
            ),
            AuthError::Unauthenticated => ApiError::unauthorized(),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(error: PostError) -> Self {
        match error {
            PostError::EmptyField(field) => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                format!("{field} must not be empty"),
                None,
            ),
            PostError::NotFound => ApiError::not_found("post not found"),
            PostError::Repo(err) => repo_error(err),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(error: ImageError) -> Self {
        match error {
            ImageError::EmptyPrompt => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::VALIDATION,
                "prompt must not be empty",
                None,
            ),
            ImageError::NotFound => ApiError::not_found("image not found"),
            ImageError::Generate(err) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::GENERATION,
                format!("image generation failed: {err}"),
                None,
            ),
            ImageError::SourceFetch(err) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::GENERATION,
                format!("could not fetch the generated image: {err}"),
                Some("the source URL may have expired; generate it again and retry".to_string()),
            ),
            ImageError::Media(err) => media_error(err),
            ImageError::Repo(err) => repo_error(err),
        }
    }
}

fn repo_error(error: RepoError) -> ApiError {
    match error {
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => {
            ApiError::bad_request("invalid input", Some(message))
        }
        other => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            other.to_string(),
            None,
        ),
    }
}

fn media_error(error: MediaStoreError) -> ApiError {
    match error {
        MediaStoreError::NotFound => ApiError::not_found("object not found"),
        MediaStoreError::InvalidKey => ApiError::bad_request("invalid object key", None),
        MediaStoreError::Io(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::MEDIA,
            message,
            None,
        ),
    }
}
