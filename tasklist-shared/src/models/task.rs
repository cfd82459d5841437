/// Task model and database operations
///
/// Every read, update and delete in this module is keyed by `(id, owner_id)`
/// in a single `WHERE` clause. A task that belongs to someone else behaves
/// exactly like a task that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL CHECK (length(btrim(title)) > 0),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     priority TEXT NOT NULL DEFAULT 'medium',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use std::{fmt, str::FromStr};

/// Priority given to tasks created without one
pub const DEFAULT_PRIORITY: &str = "medium";

/// Task model representing a to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID assigned by the database
    pub id: i64,

    /// Task title, trimmed and never empty
    pub title: String,

    /// Whether the task is done
    pub completed: bool,

    /// Free-form priority tag (e.g. "low", "medium", "high")
    pub priority: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last modified
    pub updated_at: DateTime<Utc>,

    /// User who owns the task
    pub owner_id: i64,
}

/// Input for inserting a task
///
/// Validation happens in [`crate::services::task_service`]; this struct holds
/// values that are ready to store.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owner of the new task
    pub owner_id: i64,

    /// Trimmed, non-empty title
    pub title: String,

    /// Priority tag
    pub priority: String,

    /// Value for both `created_at` and `updated_at`
    pub now: DateTime<Utc>,
}

/// Fields to change on an existing task
///
/// `None` means "leave as is". There is no way to null a column because none
/// of these columns are nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChanges {
    /// New title
    #[serde(default)]
    pub title: Option<String>,

    /// New completion state
    #[serde(default)]
    pub completed: Option<bool>,

    /// New priority tag
    #[serde(default)]
    pub priority: Option<String>,
}

/// Completion filter for listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Only tasks with `completed = true`
    Completed,

    /// Only tasks with `completed = false`
    Pending,
}

impl StatusFilter {
    /// Value of `completed` this filter selects
    pub fn completed(&self) -> bool {
        matches!(self, StatusFilter::Completed)
    }

    /// Checks whether `task` passes the filter
    pub fn matches(&self, task: &Task) -> bool {
        task.completed == self.completed()
    }

    /// Query-string form of the filter
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Completed => "completed",
            StatusFilter::Pending => "pending",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a status filter other than `completed` or `pending`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status filter '{0}', expected 'completed' or 'pending'")]
pub struct ParseStatusFilterError(pub String);

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(StatusFilter::Completed),
            "pending" => Ok(StatusFilter::Pending),
            other => Err(ParseStatusFilterError(other.to_string())),
        }
    }
}

impl Task {
    /// Inserts a new, not yet completed task
    pub async fn create(conn: &mut PgConnection, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, completed, priority, created_at, updated_at)
            VALUES ($1, $2, FALSE, $3, $4, $4)
            RETURNING id, title, completed, priority, created_at, updated_at, owner_id
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.priority)
        .bind(data.now)
        .fetch_one(conn)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, only if it belongs to `owner_id`
    pub async fn find_owned(
        conn: &mut PgConnection,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed, priority, created_at, updated_at, owner_id
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(conn)
        .await?;

        Ok(task)
    }

    /// Lists an owner's tasks, newest first
    ///
    /// Rows with equal `created_at` come out in descending id order.
    pub async fn list_owned(
        conn: &mut PgConnection,
        owner_id: i64,
        filter: Option<StatusFilter>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, completed, priority, created_at, updated_at, owner_id
            FROM tasks
            WHERE owner_id = $1
              AND ($2::BOOLEAN IS NULL OR completed = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .bind(filter.map(|f| f.completed()))
        .fetch_all(conn)
        .await?;

        Ok(tasks)
    }

    /// Applies `changes` to an owned task and stamps `updated_at`
    ///
    /// Returns `None` when no row matches `(id, owner_id)`.
    pub async fn update_owned(
        conn: &mut PgConnection,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                completed = COALESCE($4, completed),
                priority = COALESCE($5, priority),
                updated_at = $6
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, completed, priority, created_at, updated_at, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(changes.title)
        .bind(changes.completed)
        .bind(changes.priority)
        .bind(now)
        .fetch_optional(conn)
        .await?;

        Ok(task)
    }

    /// Deletes an owned task
    ///
    /// Returns false when no row matches `(id, owner_id)`.
    pub async fn delete_owned(
        conn: &mut PgConnection,
        id: i64,
        owner_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(completed: bool) -> Task {
        let now = Utc::now();
        Task {
            id: 1,
            title: "Write report".to_string(),
            completed,
            priority: DEFAULT_PRIORITY.to_string(),
            created_at: now,
            updated_at: now,
            owner_id: 1,
        }
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("completed".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert_eq!("pending".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
        assert!("done".parse::<StatusFilter>().is_err());
        assert!("Completed".parse::<StatusFilter>().is_err());
        assert!("".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::Completed.matches(&task(true)));
        assert!(!StatusFilter::Completed.matches(&task(false)));
        assert!(StatusFilter::Pending.matches(&task(false)));
        assert!(!StatusFilter::Pending.matches(&task(true)));
    }

    #[test]
    fn test_task_changes_absent_fields() {
        let changes: TaskChanges = serde_json::from_str(r#"{"completed": true}"#).unwrap();

        assert_eq!(changes.completed, Some(true));
        assert!(changes.title.is_none());
        assert!(changes.priority.is_none());
    }
}
