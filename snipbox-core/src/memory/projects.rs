use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;

use super::poisoned;
use crate::error::CoreError;
use crate::id::{ProjectId, UserId};
use crate::project::{sort_newest_first, Project, ProjectDraft, ProjectSummary};
use crate::repository::ProjectRepository;

/// Project store backed by an insertion-ordered map behind a `RwLock`.
///
/// Every operation takes the lock once, so the id+owner check and the write
/// happen atomically.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    projects: Arc<RwLock<IndexMap<ProjectId, Project>>>,
}

impl InMemoryProjectRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored projects across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.read().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn list(&self, owner: &UserId) -> Result<Vec<ProjectSummary>, CoreError> {
        let mut summaries: Vec<ProjectSummary> = self
            .projects
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|p| &p.owner_id == owner)
            .map(Project::summary)
            .collect();
        sort_newest_first(&mut summaries);
        Ok(summaries)
    }

    async fn get(&self, owner: &UserId, id: ProjectId) -> Result<Project, CoreError> {
        self.projects
            .read()
            .map_err(poisoned)?
            .get(&id)
            .filter(|p| &p.owner_id == owner)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn create(&self, owner: &UserId, draft: ProjectDraft) -> Result<Project, CoreError> {
        let project = Project::create(owner.clone(), draft, Utc::now());
        self.projects
            .write()
            .map_err(poisoned)?
            .insert(project.id, project.clone());
        tracing::debug!(project_id = %project.id, owner = %owner, "project created");
        Ok(project)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, CoreError> {
        let mut projects = self.projects.write().map_err(poisoned)?;
        let project = projects
            .get_mut(&id)
            .filter(|p| &p.owner_id == owner)
            .ok_or(CoreError::NotFound)?;
        project.apply(draft, Utc::now());
        Ok(project.clone())
    }

    async fn delete(&self, owner: &UserId, id: ProjectId) -> Result<(), CoreError> {
        let mut projects = self.projects.write().map_err(poisoned)?;
        if !projects.get(&id).is_some_and(|p| &p.owner_id == owner) {
            return Err(CoreError::NotFound);
        }
        projects.shift_remove(&id);
        Ok(())
    }
}
