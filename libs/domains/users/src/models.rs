use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity - an account that owns tasks
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (unique across all users)
    pub email: String,
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

/// DTO for a full user update
///
/// Both fields are required; a PUT replaces the stored name and email.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

impl User {
    /// Create a new user from CreateUser DTO
    pub fn new(input: CreateUser) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            email: input.email,
        }
    }

    /// Apply a full update from UpdateUser DTO
    pub fn apply_update(&mut self, update: UpdateUser) {
        self.name = update.name;
        self.email = update.email;
    }
}
