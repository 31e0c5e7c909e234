//! Auth Gate and the login/logout handlers.
//!
//! [`require_session`] runs in front of every protected route. It reads the
//! signed session cookie, resolves the token against the session store and
//! attaches the caller as a [`CurrentUser`] extension. Handlers take
//! `CurrentUser` as an extractor; they never see the raw cookie.

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use snipbox_core::{
    password::verify_password,
    session::session_ttl,
    user::{authenticate_with, normalize_email},
    CoreError, SecretString, UserId,
};
use tracing::{info, warn};

use crate::{error::ApiError, state::AppState};

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    /// Token of the session that authenticated this request.
    pub token: SecretString,
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Middleware that rejects requests without a live session.
///
/// # Errors
/// Returns [`ApiError::Unauthenticated`] for a missing, forged, unknown or
/// expired session, and [`ApiError::Internal`] if the session store fails.
/// The wrapped handler is not invoked in either case.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = state.cookies.token_from_headers(request.headers()) else {
        return Err(ApiError::Unauthenticated);
    };
    let Some(user_id) = state.sessions.resolve(token.expose_secret()).await? else {
        return Err(ApiError::Unauthenticated);
    };
    request.extensions_mut().insert(CurrentUser { user_id, token });
    Ok(next.run(request).await)
}

/// Body of `POST /api/auth/login`. No `Debug`: it carries a plaintext password.
#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/auth/login`: verify credentials and issue a session cookie.
///
/// # Errors
/// Returns [`ApiError::Validation`] for a missing email or password,
/// [`ApiError::InvalidCredentials`] if they do not match an account, and
/// [`ApiError::Internal`] on store failure.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("email and password are required".to_owned()));
    }
    let password = SecretString::new(body.password);

    let Some(user_id) =
        authenticate_with(state.users.as_ref(), &body.email, &password, verify_off_runtime).await?
    else {
        info!("login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let issued = state.sessions.create(&user_id, session_ttl()).await?;
    let cookie = state.cookies.session_cookie(&issued.token);
    info!(user_id = %user_id, expires_at = %issued.expires_at, "login succeeded");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie.to_string())]),
        Json(json!({"user": {"id": user_id, "email": normalize_email(&body.email)}})),
    ))
}

/// Argon2 is CPU-bound; keep it off the async worker threads.
async fn verify_off_runtime(password: SecretString, hash: String) -> Result<bool, CoreError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| CoreError::Credential(format!("verify task failed: {e}")))?
}

/// `POST /api/auth/logout`: end the caller's session.
///
/// Best-effort: a store failure is logged and the cookie is cleared anyway.
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    if let Err(e) = state.sessions.destroy(user.token.expose_secret()).await {
        warn!(user_id = %user.user_id, error = %e, "failed to destroy session on logout");
    } else {
        info!(user_id = %user.user_id, "logged out");
    }
    (
        AppendHeaders([(SET_COOKIE, state.cookies.removal_cookie().to_string())]),
        Json(json!({"message": "Logged out successfully"})),
    )
}
