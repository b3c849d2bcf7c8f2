use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, UpdateTask};

/// Repository trait for Task persistence
///
/// This trait defines the data access interface for tasks.
/// Implementations can use different storage backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// List all tasks
    async fn list(&self) -> TaskResult<Vec<Task>>;

    /// List all tasks owned by a user
    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>>;

    /// Update a task (full replacement of title, description, flag)
    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task>;

    /// Update only the completion flag
    async fn update_status(&self, id: Uuid, is_completed: bool) -> TaskResult<Task>;

    /// Delete a task by ID
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// In-memory implementation of TaskRepository (for development/testing)
///
/// Does not enforce the ownership foreign key; that check lives in the
/// service layer and, for PostgreSQL, in the schema.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = Task::new(input);
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, user_id = %task.user_id, "Created task");
        Ok(task)
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks.values().cloned().collect();
        // UUIDv7 ids are time-ordered, so this is insertion order
        result.sort_by_key(|t| t.id);

        Ok(result)
    }

    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|t| t.id);

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.apply_update(input);
        let updated = task.clone();

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated)
    }

    async fn update_status(&self, id: Uuid, is_completed: bool) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let task = tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.is_completed = is_completed;
        let updated = task.clone();

        tracing::info!(task_id = %id, is_completed, "Updated task status");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.remove(&id).is_some() {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(title: &str, user_id: Uuid) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: None,
            is_completed: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_task() {
        let repo = InMemoryTaskRepository::new();
        let user_id = Uuid::now_v7();

        let task = repo.create(create_input("Buy milk", user_id)).await.unwrap();
        assert_eq!(task.title, "Buy milk");
        assert!(!task.is_completed);

        let fetched = repo.get_by_id(task.id).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_list_by_user_filters_ownership() {
        let repo = InMemoryTaskRepository::new();
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();

        repo.create(create_input("Alice task 1", alice)).await.unwrap();
        repo.create(create_input("Bob task", bob)).await.unwrap();
        repo.create(create_input("Alice task 2", alice)).await.unwrap();

        let alice_tasks = repo.list_by_user(alice).await.unwrap();
        assert_eq!(alice_tasks.len(), 2);
        assert!(alice_tasks.iter().all(|t| t.user_id == alice));
    }

    #[tokio::test]
    async fn test_update_status_only_flips_flag() {
        let repo = InMemoryTaskRepository::new();
        let user_id = Uuid::now_v7();

        let task = repo
            .create(CreateTask {
                title: "Keep my title".to_string(),
                description: Some("Keep my description".to_string()),
                is_completed: None,
                user_id,
            })
            .await
            .unwrap();

        let updated = repo.update_status(task.id, true).await.unwrap();

        assert!(updated.is_completed);
        assert_eq!(updated.title, "Keep my title");
        assert_eq!(updated.description.as_deref(), Some("Keep my description"));
    }

    #[tokio::test]
    async fn test_update_missing_task_returns_not_found() {
        let repo = InMemoryTaskRepository::new();
        let missing = Uuid::new_v4();

        let result = repo
            .update(
                missing,
                UpdateTask {
                    title: "Ghost".to_string(),
                    description: None,
                    is_completed: false,
                },
            )
            .await;

        assert!(matches!(result, Err(TaskError::NotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let repo = InMemoryTaskRepository::new();
        let deleted = repo.delete(Uuid::new_v4()).await.unwrap();
        assert!(!deleted);
    }
}
