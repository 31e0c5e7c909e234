//! Postgres-backed stores for the Snipbox snippet service.
//!
//! Implements the `snipbox-core` store traits with sqlx. Schema migrations
//! live in `migrations/` and are embedded at compile time.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod connection;
mod projects;
mod sessions;
mod users;

pub use connection::{connect, migrate};
pub use projects::PgProjectRepository;
pub use sessions::PgSessionStore;
pub use users::PgUserDirectory;
