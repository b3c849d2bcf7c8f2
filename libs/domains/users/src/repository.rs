use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User};

/// Repository trait for User persistence
///
/// This trait defines the data access interface for users.
/// Implementations can use different storage backends (PostgreSQL, etc.)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    /// Get a user by ID
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// List all users
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Update an existing user (full replacement of name and email)
    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    /// Check if a user exists by ID
    async fn exists_by_id(&self, id: Uuid) -> UserResult<bool>;

    /// Check if a user exists with the given email
    async fn exists_by_email(&self, email: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        // Check for duplicate email
        let email_exists = users.values().any(|u| u.email == input.email);
        if email_exists {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = User::new(input);
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users.values().cloned().collect();
        // UUIDv7 ids are time-ordered, so this is insertion order
        result.sort_by_key(|u| u.id);

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&id) {
            return Err(UserError::NotFound(id));
        }

        // Check for duplicate email on another user
        let email_taken = users
            .values()
            .any(|u| u.id != id && u.email == input.email);
        if email_taken {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let user = users.get_mut(&id).expect("checked above");
        user.apply_update(input);
        let updated = user.clone();

        tracing::info!(user_id = %id, "Updated user");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists_by_id(&self, id: Uuid) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.contains_key(&id))
    }

    async fn exists_by_email(&self, email: &str) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }
}
