/// In-memory storage
///
/// Backs the test suites and the API's testing mode. All state lives behind a
/// single mutex, so every call sees and applies its predicate atomically.
/// Ids are assigned from per-table counters starting at 1.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{StoreError, StoreResult, TaskStore, UserStore};
use crate::models::{
    task::{CreateTask, StatusFilter, Task, TaskChanges},
    user::{CreateUser, User},
};

#[derive(Debug, Default)]
struct State {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: i64,
    next_task_id: i64,
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave State half-written:
        // every mutation is a single push, assignment or removal.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut state = self.lock();

        if state.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::Conflict("users_email_key".to_string()));
        }

        state.next_user_id += 1;
        let user = User {
            id: state.next_user_id,
            email: data.email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, data: CreateTask) -> StoreResult<Task> {
        let mut state = self.lock();

        if !state.users.iter().any(|u| u.id == data.owner_id) {
            return Err(StoreError::UnknownOwner(data.owner_id));
        }

        state.next_task_id += 1;
        let task = Task {
            id: state.next_task_id,
            title: data.title,
            completed: false,
            priority: data.priority,
            created_at: data.now,
            updated_at: data.now,
            owner_id: data.owner_id,
        };
        state.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: i64, owner_id: i64) -> StoreResult<Option<Task>> {
        Ok(self
            .lock()
            .tasks
            .iter()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .cloned())
    }

    async fn list_tasks(
        &self,
        owner_id: i64,
        filter: Option<StatusFilter>,
    ) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .lock()
            .tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .filter(|t| filter.map_or(true, |f| f.matches(t)))
            .cloned()
            .collect();

        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(tasks)
    }

    async fn update_task(
        &self,
        id: i64,
        owner_id: i64,
        changes: TaskChanges,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.lock();

        let Some(task) = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(completed) = changes.completed {
            task.completed = completed;
        }
        if let Some(priority) = changes.priority {
            task.priority = priority;
        }
        task.updated_at = now;

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: i64, owner_id: i64) -> StoreResult<bool> {
        let mut state = self.lock();

        let before = state.tasks.len();
        state.tasks.retain(|t| !(t.id == id && t.owner_id == owner_id));

        Ok(state.tasks.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$hash".to_string(),
        }
    }

    fn new_task(owner_id: i64, title: &str, now: DateTime<Utc>) -> CreateTask {
        CreateTask {
            owner_id,
            title: title.to_string(),
            priority: "medium".to_string(),
            now,
        }
    }

    /// Store with users 1 and 2 registered
    async fn store_with_owners() -> MemoryStore {
        let store = MemoryStore::new();
        store.create_user(new_user("one@example.com")).await.unwrap();
        store.create_user(new_user("two@example.com")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();

        let first = store.create_user(new_user("a@example.com")).await.unwrap();
        let err = store
            .create_user(CreateUser {
                email: "a@example.com".to_string(),
                password_hash: "other".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = store.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.password_hash, "$argon2id$hash");
    }

    #[tokio::test]
    async fn test_email_match_is_exact() {
        let store = MemoryStore::new();
        store.create_user(new_user("Alice@example.com")).await.unwrap();

        assert!(store.find_user_by_email("alice@example.com").await.unwrap().is_none());
        assert!(store.create_user(new_user("alice@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_user_ids_are_sequential() {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("a@example.com")).await.unwrap();
        let b = store.create_user(new_user("b@example.com")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.find_user_by_id(2).await.unwrap().unwrap().email, "b@example.com");
        assert!(store.find_user_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let store = store_with_owners().await;
        let base = Utc::now();

        store.insert_task(new_task(1, "old", base)).await.unwrap();
        store
            .insert_task(new_task(1, "new", base + Duration::seconds(10)))
            .await
            .unwrap();
        store
            .insert_task(new_task(1, "middle", base + Duration::seconds(5)))
            .await
            .unwrap();

        let titles: Vec<String> = store
            .list_tasks(1, None)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_list_ties_break_by_id() {
        let store = store_with_owners().await;
        let now = Utc::now();

        let first = store.insert_task(new_task(1, "first", now)).await.unwrap();
        let second = store.insert_task(new_task(1, "second", now)).await.unwrap();

        let ids: Vec<i64> = store
            .list_tasks(1, None)
            .await
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let store = store_with_owners().await;
        let now = Utc::now();

        let task = store.insert_task(new_task(1, "mine", now)).await.unwrap();

        assert!(store.find_task(task.id, 2).await.unwrap().is_none());
        assert!(store.list_tasks(2, None).await.unwrap().is_empty());
        assert!(store
            .update_task(task.id, 2, TaskChanges::default(), now)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_task(task.id, 2).await.unwrap());

        // Untouched by the foreign calls above
        let stored = store.find_task(task.id, 1).await.unwrap().unwrap();
        assert_eq!(stored, task);
    }

    #[tokio::test]
    async fn test_filter() {
        let store = store_with_owners().await;
        let now = Utc::now();

        let done = store.insert_task(new_task(1, "done", now)).await.unwrap();
        store.insert_task(new_task(1, "todo", now)).await.unwrap();
        store
            .update_task(
                done.id,
                1,
                TaskChanges {
                    completed: Some(true),
                    ..Default::default()
                },
                now,
            )
            .await
            .unwrap();

        let completed = store.list_tasks(1, Some(StatusFilter::Completed)).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "done");

        let pending = store.list_tasks(1, Some(StatusFilter::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "todo");
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let store = store_with_owners().await;
        let created = Utc::now();
        let later = created + Duration::seconds(1);

        let task = store.insert_task(new_task(1, "draft", created)).await.unwrap();
        let updated = store
            .update_task(
                task.id,
                1,
                TaskChanges {
                    priority: Some("high".to_string()),
                    ..Default::default()
                },
                later,
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "draft");
        assert!(!updated.completed);
        assert_eq!(updated.priority, "high");
        assert_eq!(updated.created_at, created);
        assert_eq!(updated.updated_at, later);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store_with_owners().await;
        let task = store.insert_task(new_task(1, "gone", Utc::now())).await.unwrap();

        assert!(store.delete_task(task.id, 1).await.unwrap());
        assert!(!store.delete_task(task.id, 1).await.unwrap());
        assert!(store.find_task(task.id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_for_unknown_owner() {
        let store = store_with_owners().await;

        let err = store
            .insert_task(new_task(999, "orphan", Utc::now()))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::UnknownOwner(999)));
        assert!(store.list_tasks(999, None).await.unwrap().is_empty());
    }
}
