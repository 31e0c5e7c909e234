//! HTTP gateway for the Snipbox snippet service.
//!
//! Serves session login/logout, owner-scoped project CRUD and the execution
//! proxy endpoint. Stores are chosen at startup: Postgres when `DATABASE_URL`
//! is set, in-memory otherwise.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod auth;
pub mod config;
pub mod error;
pub mod execute;
pub mod projects;
pub mod routes;
pub mod session_cookie;
pub mod state;

pub use config::GatewayConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use session_cookie::CookieSettings;
pub use state::AppState;
