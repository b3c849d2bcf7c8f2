use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr};
use uuid::Uuid;

use crate::{
    entity,
    error::{TaskError, TaskResult},
    models::{CreateTask, Task, UpdateTask},
    repository::TaskRepository,
};

pub struct PgTaskRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Map an insert error, turning foreign key violations on user_id
    /// into UserNotFound. The constraint is the backstop for the
    /// check-then-act race between the service's owner check and the
    /// write (the owner can be deleted in between).
    fn map_insert_err(e: DbErr, user_id: Uuid) -> TaskError {
        match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => TaskError::UserNotFound(user_id),
            _ => TaskError::Internal(format!("Database error: {}", e)),
        }
    }

    /// Map an update error. A concurrent delete between the existence
    /// check and the write surfaces as RecordNotUpdated, which is
    /// NotFound from the caller's point of view.
    fn map_update_err(e: DbErr, id: Uuid) -> TaskError {
        match e {
            DbErr::RecordNotUpdated => TaskError::NotFound(id),
            e => TaskError::Internal(format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let user_id = input.user_id;
        let active_model: entity::ActiveModel = input.into();

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| Self::map_insert_err(e, user_id))?;

        tracing::info!(task_id = %model.id, user_id = %model.user_id, "Created task");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> TaskResult<Vec<Task>> {
        // UUIDv7 ids are time-ordered, so this is creation order
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::UserId.eq(user_id))
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateTask) -> TaskResult<Task> {
        // Fetch existing task; ownership is carried over unchanged
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?
            .ok_or(TaskError::NotFound(id))?;

        let active_model = entity::ActiveModel {
            id: Set(id),
            title: Set(input.title),
            description: Set(input.description),
            is_completed: Set(input.is_completed),
            user_id: Set(model.user_id),
        };

        let updated_model = self
            .base
            .update(active_model)
            .await
            .map_err(|e| Self::map_update_err(e, id))?;

        tracing::info!(task_id = %id, "Updated task");
        Ok(updated_model.into())
    }

    async fn update_status(&self, id: Uuid, is_completed: bool) -> TaskResult<Task> {
        let exists = self
            .base
            .exists_by_id(id)
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;
        if !exists {
            return Err(TaskError::NotFound(id));
        }

        // Partial update: only the flag column is set
        let active_model = entity::ActiveModel {
            id: Set(id),
            is_completed: Set(is_completed),
            ..Default::default()
        };

        let updated_model = self
            .base
            .update(active_model)
            .await
            .map_err(|e| Self::map_update_err(e, id))?;

        tracing::info!(task_id = %id, is_completed, "Updated task status");
        Ok(updated_model.into())
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| TaskError::Internal(format!("Database error: {}", e)))?;

        if rows_affected > 0 {
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

    #[test]
    fn test_concurrent_delete_during_update_maps_to_not_found() {
        let id = Uuid::new_v4();

        let err = PgTaskRepository::map_update_err(DbErr::RecordNotUpdated, id);

        assert!(matches!(err, TaskError::NotFound(missing) if missing == id));
    }

    #[test]
    fn test_unclassified_update_error_maps_to_internal() {
        let err = PgTaskRepository::map_update_err(DbErr::Custom("boom".to_string()), Uuid::new_v4());

        assert!(matches!(err, TaskError::Internal(_)));
    }
}
