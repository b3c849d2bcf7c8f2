use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use domain_users::{UserRepository, UserService};

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Holds the users service so that task creation and per-user listing
/// can verify the owner exists before touching task storage.
#[derive(Clone)]
pub struct TaskService<T: TaskRepository, U: UserRepository> {
    repository: Arc<T>,
    user_service: UserService<U>,
}

impl<T: TaskRepository, U: UserRepository> TaskService<T, U> {
    pub fn new(repository: T, user_service: UserService<U>) -> Self {
        Self {
            repository: Arc::new(repository),
            user_service,
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> TaskResult<()> {
        let exists = self
            .user_service
            .user_exists(user_id)
            .await
            .map_err(|e| TaskError::Internal(e.to_string()))?;

        if !exists {
            return Err(TaskError::UserNotFound(user_id));
        }

        Ok(())
    }

    /// Create a new task for an existing user
    ///
    /// The completion flag defaults to false when omitted.
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.ensure_user_exists(input.user_id).await?;

        self.repository.create(input).await
    }

    /// Get a task by ID
    pub async fn get_task(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// List all tasks
    pub async fn list_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.list().await
    }

    /// List all tasks owned by a user
    ///
    /// Fails with UserNotFound when the user does not exist, even if
    /// the listing would be empty either way.
    pub async fn list_tasks_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        self.ensure_user_exists(user_id).await?;

        self.repository.list_by_user(user_id).await
    }

    /// Update a task (full replacement of title, description, flag)
    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Update only the completion flag
    pub async fn update_task_status(&self, id: Uuid, is_completed: bool) -> TaskResult<Task> {
        self.repository.update_status(id, is_completed).await
    }

    /// Delete a task
    pub async fn delete_task(&self, id: Uuid) -> TaskResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }
}
