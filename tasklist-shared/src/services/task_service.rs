/// Ownership-scoped task operations
///
/// Every operation takes the caller's `owner_id` and passes it down to the
/// store together with the task id. A task owned by someone else yields
/// [`TaskError::NotFound`], the same error as a task that was never created.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use tasklist_shared::models::user::CreateUser;
/// use tasklist_shared::services::task_service::{NewTask, TaskService};
/// use tasklist_shared::store::{memory::MemoryStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// let user = store
///     .create_user(CreateUser {
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     })
///     .await?;
/// let service = TaskService::new(store);
///
/// let task = service
///     .create(user.id, NewTask { title: "  Buy milk ".to_string(), priority: None })
///     .await?;
/// assert_eq!(task.title, "Buy milk");
/// assert_eq!(task.priority, "medium");
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::task::{CreateTask, StatusFilter, Task, TaskChanges, DEFAULT_PRIORITY};
use crate::store::{StoreError, TaskStore};

/// Error type for task operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Title is empty after trimming
    #[error("Title must not be empty")]
    EmptyTitle,

    /// No task with this id belongs to the caller
    #[error("Task {0} not found")]
    NotFound(i64),

    /// Storage failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Title, trimmed before storing
    pub title: String,

    /// Priority tag, `"medium"` when absent
    #[serde(default)]
    pub priority: Option<String>,
}

/// Trims `title`, rejecting blank input
fn normalize_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Task operations scoped to a single owner per call
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Store this service writes to
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Creates a task for `owner_id`
    ///
    /// # Errors
    ///
    /// `EmptyTitle` if the title is blank; nothing is stored in that case.
    pub async fn create(&self, owner_id: i64, new_task: NewTask) -> Result<Task, TaskError> {
        let title = normalize_title(&new_task.title)?;
        let priority = new_task
            .priority
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string());

        let task = self
            .store
            .insert_task(CreateTask {
                owner_id,
                title,
                priority,
                now: Utc::now(),
            })
            .await?;

        info!(task_id = task.id, owner_id, "Task created");
        Ok(task)
    }

    /// Lists the owner's tasks, newest first
    pub async fn list(
        &self,
        owner_id: i64,
        filter: Option<StatusFilter>,
    ) -> Result<Vec<Task>, TaskError> {
        let tasks = self.store.list_tasks(owner_id, filter).await?;
        debug!(owner_id, filter = ?filter, count = tasks.len(), "Tasks listed");
        Ok(tasks)
    }

    /// Fetches one of the owner's tasks
    pub async fn get(&self, task_id: i64, owner_id: i64) -> Result<Task, TaskError> {
        self.store
            .find_task(task_id, owner_id)
            .await?
            .ok_or(TaskError::NotFound(task_id))
    }

    /// Applies the present fields of `changes` and refreshes `updated_at`
    ///
    /// `updated_at` moves forward even when `changes` is empty.
    pub async fn update(
        &self,
        task_id: i64,
        owner_id: i64,
        mut changes: TaskChanges,
    ) -> Result<Task, TaskError> {
        if let Some(title) = changes.title.take() {
            changes.title = Some(normalize_title(&title)?);
        }

        let task = self
            .store
            .update_task(task_id, owner_id, changes, Utc::now())
            .await?
            .ok_or(TaskError::NotFound(task_id))?;

        info!(task_id, owner_id, "Task updated");
        Ok(task)
    }

    /// Permanently deletes one of the owner's tasks
    pub async fn delete(&self, task_id: i64, owner_id: i64) -> Result<(), TaskError> {
        if !self.store.delete_task(task_id, owner_id).await? {
            return Err(TaskError::NotFound(task_id));
        }

        info!(task_id, owner_id, "Task deleted");
        Ok(())
    }
}
