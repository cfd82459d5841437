/// Database models for Tasklist
///
/// This module contains the database models and their SQL operations.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `task`: To-do items owned by a user
///
/// Model operations take a `&mut PgConnection` so that callers decide the
/// transaction boundary (see [`crate::store::postgres`]).
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::models::user::{User, CreateUser};
/// use tasklist_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let mut tx = pool.begin().await?;
///
/// let user = User::create(&mut tx, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
pub mod task;
