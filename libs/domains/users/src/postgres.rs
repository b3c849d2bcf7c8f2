use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, UpdateUser, User},
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Map an insert/update error, turning unique violations on the email
    /// column into DuplicateEmail. The constraint is the backstop for the
    /// check-then-act race between exists_by_email and the write.
    fn map_write_err(e: DbErr, email: &str) -> UserError {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                UserError::DuplicateEmail(email.to_string())
            }
            _ => UserError::Internal(format!("Database error: {}", e)),
        }
    }

    /// Map an update error. A concurrent delete between the find and
    /// the write surfaces as RecordNotUpdated, which is NotFound from
    /// the caller's point of view.
    fn map_update_err(e: DbErr, id: Uuid, email: &str) -> UserError {
        match e {
            DbErr::RecordNotUpdated => UserError::NotFound(id),
            e => Self::map_write_err(e, email),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        // Check for duplicate email
        let exists = self.exists_by_email(&input.email).await?;
        if exists {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let email = input.email.clone();
        let active_model: entity::ActiveModel = input.into();

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| Self::map_write_err(e, &email))?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(model.map(|m| m.into()))
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        // UUIDv7 ids are time-ordered, so this is creation order
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        // Fetch existing user
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .ok_or(UserError::NotFound(id))?;

        // Check for duplicate email if the email is changing
        if input.email != model.email {
            let email_taken = self.exists_by_email(&input.email).await?;
            if email_taken {
                return Err(UserError::DuplicateEmail(input.email));
            }
        }

        let email = input.email.clone();
        let active_model = entity::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            email: Set(input.email),
        };

        let updated_model = self
            .base
            .update(active_model)
            .await
            .map_err(|e| Self::map_update_err(e, id, &email))?;

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated_model.into())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let rows_affected = self
            .base
            .delete_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?;

        if rows_affected > 0 {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_id(&self, id: Uuid) -> UserResult<bool> {
        self.base
            .exists_by_id(id)
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let exists = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(self.base.db())
            .await
            .map_err(|e| UserError::Internal(format!("Database error: {}", e)))?
            .is_some();

        Ok(exists)
    }
}
