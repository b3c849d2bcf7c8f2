use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new user with validation
    ///
    /// Fails with DuplicateEmail if the email is already registered.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// List all users
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Update a user (full replacement of name and email)
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a user
    ///
    /// The user's tasks are removed by the storage layer (cascade delete).
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        Ok(())
    }

    /// Check whether a user exists
    ///
    /// Used by other domains that reference users (e.g. task ownership).
    pub async fn user_exists(&self, id: Uuid) -> UserResult<bool> {
        self.repository.exists_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn sample_user(id: Uuid) -> User {
        User {
            id,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_email() {
        let mock_repo = MockUserRepository::new();
        let service = UserService::new(mock_repo);

        let result = service
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "not-an-email".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_user_propagates_duplicate_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_create()
            .returning(|input| Err(UserError::DuplicateEmail(input.email)));

        let service = UserService::new(mock_repo);
        let result = service
            .create_user(CreateUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
            })
            .await;

        assert!(matches!(result, Err(UserError::DuplicateEmail(email)) if email == "bob@example.com"));
    }

    #[tokio::test]
    async fn test_get_user_returns_not_found_for_missing() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = UserService::new(mock_repo);
        let result = service.get_user(id).await;

        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_get_user_returns_user() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |id| Ok(Some(sample_user(id))));

        let service = UserService::new(mock_repo);
        let user = service.get_user(id).await.unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_delete_user_maps_missing_to_not_found() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_delete()
            .with(eq(id))
            .returning(|_| Ok(false));

        let service = UserService::new(mock_repo);
        let result = service.delete_user(id).await;

        assert!(matches!(result, Err(UserError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_user_exists_delegates_to_repository() {
        let mut mock_repo = MockUserRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_exists_by_id()
            .with(eq(id))
            .returning(|_| Ok(true));

        let service = UserService::new(mock_repo);
        assert!(service.user_exists(id).await.unwrap());
    }
}
