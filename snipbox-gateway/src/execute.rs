//! `POST /api/execute`: run a snippet through the execution proxy.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use snipbox_core::project::MAX_CODE_BYTES;
use snipbox_runner::{ExecutionOutcome, Language};

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// Largest stdin forwarded to the runner.
pub const MAX_STDIN_BYTES: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct ExecuteBody {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub stdin: String,
}

/// Runner failures are not errors here: they come back as a `200` with a
/// `failed` outcome.
///
/// # Errors
/// Returns [`ApiError::Validation`] for an unknown language, blank code or
/// oversized input.
pub async fn execute(
    State(state): State<AppState>,
    user: CurrentUser,
    body: Result<Json<ExecuteBody>, JsonRejection>,
) -> Result<Json<ExecutionOutcome>, ApiError> {
    let Json(body) = body?;
    let language: Language = body
        .language
        .parse()
        .map_err(|e: snipbox_runner::UnknownLanguage| ApiError::Validation(e.to_string()))?;
    if body.code.trim().is_empty() {
        return Err(ApiError::Validation("code must not be empty".to_owned()));
    }
    if body.code.len() > MAX_CODE_BYTES {
        return Err(ApiError::Validation(format!("code exceeds {MAX_CODE_BYTES} bytes")));
    }
    if body.stdin.len() > MAX_STDIN_BYTES {
        return Err(ApiError::Validation(format!("stdin exceeds {MAX_STDIN_BYTES} bytes")));
    }

    tracing::debug!(user_id = %user.user_id, %language, "execute requested");
    let outcome = state.proxy.execute(language, &body.code, &body.stdin).await;
    Ok(Json(outcome))
}
