//! Core types for the Snipbox snippet service.
//!
//! Defines the project model and its validation, the owner-scoped store
//! contracts (projects, sessions, users), password hashing, and in-memory
//! implementations of every store.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod id;
pub mod memory;
pub mod password;
pub mod project;
pub mod repository;
pub mod secret;
pub mod session;
pub mod user;

pub use error::CoreError;
pub use id::{ProjectId, UserId};
pub use memory::{InMemoryProjectRepository, InMemorySessionStore, InMemoryUserDirectory};
pub use project::{Project, ProjectDraft, ProjectSummary};
pub use repository::ProjectRepository;
pub use secret::SecretString;
pub use session::{IssuedSession, Session, SessionStore};
pub use user::{UserAccount, UserDirectory};
