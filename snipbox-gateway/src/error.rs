//! Error types for the gateway crate.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use snipbox_core::CoreError;
use snipbox_runner::RunnerError;

use crate::config::ConfigError;

/// Where the client should send an unauthenticated user.
pub const LOGIN_PATH: &str = "/login";

/// Errors that can occur during request handling.
///
/// Every variant renders as a JSON body with a stable `code` and a
/// human-readable `message`. Internal details are logged, never returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No valid session accompanies the request.
    #[error("not authenticated")]
    Unauthenticated,

    /// Login with an unknown email or a wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request body is malformed or fails validation.
    #[error("{0}")]
    Validation(String),

    /// The project does not exist or belongs to someone else.
    #[error("project not found")]
    NotFound,

    /// A store or other dependency failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { .. } => ApiError::Validation(err.to_string()),
            CoreError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "code": "UNAUTHENTICATED",
                    "message": "Not authenticated",
                    "redirectTo": LOGIN_PATH,
                }),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"code": "INVALID_CREDENTIALS", "message": "Invalid email or password"}),
            ),
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({"code": "VALIDATION_ERROR", "message": message}),
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({"code": "NOT_FOUND", "message": "Project not found"}),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"code": "INTERNAL_ERROR", "message": "Server error"}),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Errors that stop the gateway from starting.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("store error: {0}")]
    Store(#[from] CoreError),

    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = match axum::body::to_bytes(resp.into_body(), 4096).await {
            Ok(b) => b,
            Err(e) => panic!("failed to read body: {e}"),
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => panic!("invalid JSON: {e}"),
        }
    }

    #[tokio::test]
    async fn unauthenticated_carries_login_redirect() {
        let resp = ApiError::Unauthenticated.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "UNAUTHENTICATED");
        assert_eq!(body["redirectTo"], "/login");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let resp = ApiError::Internal("pool timed out on 10.0.0.7".to_owned()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["message"], "Server error");
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[test]
    fn core_errors_map_to_matching_statuses() {
        let cases = [
            (CoreError::validation("name", "must not be empty"), StatusCode::BAD_REQUEST),
            (CoreError::NotFound, StatusCode::NOT_FOUND),
            (CoreError::Storage("down".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
            (CoreError::Credential("bad hash".to_owned()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (core, expected) in cases {
            let resp = ApiError::from(core).into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ApiError::from(CoreError::validation("code", "must not be empty"));
        assert!(err.to_string().contains("code"), "got: {err}");
    }

    #[test]
    fn startup_error_wraps_config_error() {
        let err: StartupError = ConfigError::Missing("SNIPBOX_RUNNER_URL").into();
        assert!(matches!(err, StartupError::Config(_)));
        assert!(err.to_string().contains("SNIPBOX_RUNNER_URL"), "got: {err}");
    }

    #[test]
    fn invalid_credentials_is_401() {
        let resp = ApiError::InvalidCredentials.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
