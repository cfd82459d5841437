/// PostgreSQL storage
///
/// Each trait method opens one transaction, runs its statement, and commits.
/// On any error the method returns early; dropping the uncommitted
/// `Transaction` rolls it back and hands the connection back to the pool.
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
/// use tasklist_shared::store::{postgres::PgStore, TaskStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
/// let tasks = store.list_tasks(1, None).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    task::{CreateTask, StatusFilter, Task, TaskChanges},
    user::{CreateUser, User},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps unique violations to `StoreError::Conflict`
fn map_write_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            StoreError::Conflict(constraint)
        }
        other => StoreError::Database(other),
    }
}

/// Maps a `tasks.owner_id` foreign key violation to `StoreError::UnknownOwner`
fn map_insert_task_error(err: sqlx::Error, owner_id: i64) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::UnknownOwner(owner_id)
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tx = self.pool.begin().await?;
        let user = User::create(&mut *tx, data).await.map_err(map_write_error)?;
        tx.commit().await?;

        debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let user = User::find_by_email(&mut *tx, email).await?;
        tx.commit().await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let user = User::find_by_id(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let owner_id = data.owner_id;
        let mut tx = self.pool.begin().await?;
        let task = Task::create(&mut *tx, data)
            .await
            .map_err(|e| map_insert_task_error(e, owner_id))?;
        tx.commit().await?;

        debug!(task_id = task.id, owner_id = task.owner_id, "Inserted task");
        Ok(task)
    }

    async fn find_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;
        let task = Task::find_owned(&mut *tx, id, owner_id).await?;
        tx.commit().await?;

        Ok(task)
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        filter: Option<StatusFilter>,
    ) -> StoreResult<Vec<Task>> {
        let mut tx = self.pool.begin().await?;
        let tasks = Task::list_owned(&mut *tx, owner_id, filter).await?;
        tx.commit().await?;

        debug!(owner_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let mut tx = self.pool.begin().await?;
        let task = Task::update_owned(&mut *tx, id, owner_id, changes, now).await?;
        tx.commit().await?;

        Ok(task)
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let deleted = Task::delete_owned(&mut *tx, id, owner_id).await?;
        tx.commit().await?;

        Ok(deleted)
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}
