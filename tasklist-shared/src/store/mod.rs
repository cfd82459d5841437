/// Storage traits
///
/// The service layer talks to storage only through [`UserStore`] and
/// [`TaskStore`]. Two implementations exist:
///
/// - [`postgres::PgStore`]: production storage on PostgreSQL, one transaction
///   per call
/// - [`memory::MemoryStore`]: process-local storage for tests and testing mode
///
/// Implementations must apply the `(id, owner_id)` predicate atomically on
/// every owner-scoped call. They never check ownership as a second step.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    task::{CreateTask, StatusFilter, Task, TaskChanges},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. duplicate email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The task's owner is not a registered user
    #[error("User {0} does not exist")]
    UnknownOwner(i64),

    /// Database or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Account storage
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, failing with `StoreError::Conflict` if the email is taken
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    /// Looks up a user by exact email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Looks up a user by ID
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
}

/// Owner-scoped task storage
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Inserts a task, failing with `StoreError::UnknownOwner` if no user has
    /// id `owner_id`
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task>;

    /// Fetches a task matching both `id` and `owner_id`
    async fn find_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>>;

    /// Lists an owner's tasks, newest `created_at` first
    async fn list_tasks(&self, owner_id: i64, filter: Option<StatusFilter>)
        -> StoreResult<Vec<Task>>;

    /// Applies `changes` and sets `updated_at = now` on a task matching both
    /// `id` and `owner_id`
    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Task>>;

    /// Deletes a task matching both `id` and `owner_id`; false if none matched
    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<bool>;

    /// Checks that the backing store is reachable
    async fn ping(&self) -> StoreResult<()>;
}
