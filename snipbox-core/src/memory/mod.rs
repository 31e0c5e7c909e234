//! In-process implementations of the store traits.
//!
//! Used by tests and by the gateway when no `DATABASE_URL` is configured.
//! Everything is lost when the process exits.

mod projects;
mod sessions;
mod users;

pub use projects::InMemoryProjectRepository;
pub use sessions::InMemorySessionStore;
pub use users::InMemoryUserDirectory;

use crate::error::CoreError;

fn poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("lock poisoned".to_owned())
}
