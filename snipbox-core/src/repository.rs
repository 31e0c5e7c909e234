//! Owner-scoped project storage contract.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::id::{ProjectId, UserId};
use crate::project::{Project, ProjectDraft, ProjectSummary};

/// CRUD over projects, always filtered by the calling user.
///
/// A project owned by someone else is indistinguishable from a missing one:
/// every lookup, update and delete matches on id *and* owner, and a miss is
/// [`CoreError::NotFound`].
///
/// # Cancel Safety
/// Each mutating method is a single atomic write. Dropping the future either
/// leaves the previous state untouched or the write fully applied.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Summaries of the caller's projects, newest `updated_at` first, ties in
    /// insertion order.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the backend cannot be queried.
    async fn list(&self, owner: &UserId) -> Result<Vec<ProjectSummary>, CoreError>;

    /// Fetches one of the caller's projects.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if no project with `id` is owned by `owner`.
    async fn get(&self, owner: &UserId, id: ProjectId) -> Result<Project, CoreError>;

    /// Persists a new project owned by `owner`.
    ///
    /// # Errors
    /// Returns [`CoreError::Storage`] if the record cannot be written.
    async fn create(&self, owner: &UserId, draft: ProjectDraft) -> Result<Project, CoreError>;

    /// Overwrites `name` and `code` and advances `updated_at`.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if no project with `id` is owned by `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, CoreError>;

    /// Removes one of the caller's projects.
    ///
    /// # Errors
    /// Returns [`CoreError::NotFound`] if no project with `id` is owned by
    /// `owner`, including when it was already deleted.
    async fn delete(&self, owner: &UserId, id: ProjectId) -> Result<(), CoreError>;
}
