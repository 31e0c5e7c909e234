use async_trait::async_trait;
use chrono::{DateTime, Utc};
use snipbox_core::{CoreError, Project, ProjectDraft, ProjectId, ProjectRepository, ProjectSummary, UserId};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::connection::storage;

const PROJECT_COLUMNS: &str = "id, owner_id, name, code, created_at, updated_at";

/// Postgres implementation of [`ProjectRepository`].
///
/// Every statement filters on `owner_id`, and each mutation is a single
/// statement, so the ownership check and the write cannot interleave with
/// another writer.
#[derive(Debug, Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProjectRecord {
    id: Uuid,
    owner_id: String,
    name: String,
    code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRecord> for Project {
    fn from(row: ProjectRecord) -> Self {
        Project::restore(
            row.id.into(),
            UserId::new(row.owner_id),
            row.name,
            row.code,
            row.created_at,
            row.updated_at,
        )
    }
}

#[derive(FromRow)]
struct SummaryRecord {
    id: Uuid,
    name: String,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn list(&self, owner: &UserId) -> Result<Vec<ProjectSummary>, CoreError> {
        let rows: Vec<SummaryRecord> = sqlx::query_as(
            "SELECT id, name, updated_at FROM projects WHERE owner_id = $1 ORDER BY updated_at DESC, seq ASC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows
            .into_iter()
            .map(|r| ProjectSummary::new(r.id.into(), r.name, r.updated_at))
            .collect())
    }

    async fn get(&self, owner: &UserId, id: ProjectId) -> Result<Project, CoreError> {
        let row: Option<ProjectRecord> = sqlx::query_as(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(Into::into).ok_or(CoreError::NotFound)
    }

    async fn create(&self, owner: &UserId, draft: ProjectDraft) -> Result<Project, CoreError> {
        // Timestamps come from the database clock, the same one `update` uses.
        let row: ProjectRecord = sqlx::query_as(&format!(
            "WITH stamp AS (SELECT clock_timestamp() AS ts) \
             INSERT INTO projects ({PROJECT_COLUMNS}) \
             SELECT $1, $2, $3, $4, stamp.ts, stamp.ts FROM stamp \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(owner.as_str())
        .bind(draft.name())
        .bind(draft.code())
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;

        let project: Project = row.into();
        tracing::debug!(project_id = %project.id, owner = %owner, "project created");
        Ok(project)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: ProjectId,
        draft: ProjectDraft,
    ) -> Result<Project, CoreError> {
        let row: Option<ProjectRecord> = sqlx::query_as(&format!(
            "UPDATE projects \
             SET name = $3, code = $4, \
                 updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .bind(draft.name())
        .bind(draft.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(Into::into).ok_or(CoreError::NotFound)
    }

    async fn delete(&self, owner: &UserId, id: ProjectId) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound);
        }
        Ok(())
    }
}
