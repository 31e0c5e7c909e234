use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{ProjectId, UserId};

/// Longest accepted project name, in characters.
pub const MAX_NAME_CHARS: usize = 120;

/// Largest accepted snippet body, in bytes.
pub const MAX_CODE_BYTES: usize = 256 * 1024;

/// A named code snippet owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Project {
    /// Identifier assigned at creation. Never changes.
    pub id: ProjectId,
    /// The user who created the project. Never changes.
    pub owner_id: UserId,
    /// Display name, stored trimmed.
    pub name: String,
    /// Snippet source, stored verbatim.
    pub code: String,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last written.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Builds a freshly created project from a validated draft.
    ///
    /// `created_at` and `updated_at` are the same instant.
    #[must_use]
    pub fn create(owner_id: UserId, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: ProjectId::new(),
            owner_id,
            name: draft.name,
            code: draft.code,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a project from persisted fields.
    #[must_use]
    pub fn restore(
        id: ProjectId,
        owner_id: UserId,
        name: String,
        code: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self { id, owner_id, name, code, created_at, updated_at }
    }

    /// Applies `draft` in place and advances `updated_at`.
    pub fn apply(&mut self, draft: ProjectDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.code = draft.code;
        self.updated_at = next_updated_at(self.updated_at, now);
    }

    /// The list view of this project.
    #[must_use]
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id,
            name: self.name.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// Code-free projection returned by project listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub updated_at: DateTime<Utc>,
}

impl ProjectSummary {
    #[must_use]
    pub fn new(id: ProjectId, name: String, updated_at: DateTime<Utc>) -> Self {
        Self { id, name, updated_at }
    }
}

/// Validated `name`/`code` pair accepted by create and update.
///
/// The only way to obtain one is [`ProjectDraft::new`], so a store never sees
/// an empty or oversized field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    name: String,
    code: String,
}

impl ProjectDraft {
    /// Validates raw input.
    ///
    /// # Errors
    /// Returns [`CoreError::Validation`] if either field is blank after
    /// trimming or exceeds [`MAX_NAME_CHARS`] / [`MAX_CODE_BYTES`].
    pub fn new(name: &str, code: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::validation("name", "must not be empty"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(CoreError::validation(
                "name",
                format!("must be at most {MAX_NAME_CHARS} characters"),
            ));
        }
        if code.trim().is_empty() {
            return Err(CoreError::validation("code", "must not be empty"));
        }
        if code.len() > MAX_CODE_BYTES {
            return Err(CoreError::validation(
                "code",
                format!("must be at most {MAX_CODE_BYTES} bytes"),
            ));
        }
        Ok(Self { name: name.to_owned(), code: code.to_owned() })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

/// Timestamp for an update that happened at `now` to a record last written at
/// `previous`.
///
/// Always at least one microsecond after `previous`, so `updated_at` strictly
/// increases even when the clock has not moved (or moved backwards).
#[must_use]
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}

/// Orders summaries newest-first by `updated_at`.
///
/// The sort is stable, so callers that pass summaries in insertion order get
/// ties broken by insertion order.
pub fn sort_newest_first(summaries: &mut [ProjectSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}
