use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Task entity - a unit of work owned by a user
///
/// Serialized in camelCase on the wire (`isCompleted`, `userId`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Short title
    pub title: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Completion flag
    pub is_completed: bool,
    /// Owning user
    pub user_id: Uuid,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to false when omitted
    pub is_completed: Option<bool>,
    pub user_id: Uuid,
}

/// DTO for a full task update
///
/// All three mutable fields are required; a PUT replaces them. The
/// owning user never changes.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

/// DTO for flipping only the completion flag
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskStatus {
    pub is_completed: bool,
}

impl Task {
    /// Create a new task from CreateTask DTO
    pub fn new(input: CreateTask) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            is_completed: input.is_completed.unwrap_or(false),
            user_id: input.user_id,
        }
    }

    /// Apply a full update from UpdateTask DTO
    pub fn apply_update(&mut self, update: UpdateTask) {
        self.title = update.title;
        self.description = update.description;
        self.is_completed = update.is_completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(title: &str) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: None,
            is_completed: None,
            user_id: Uuid::now_v7(),
        }
    }

    #[test]
    fn test_create_task_validation_rejects_empty_title() {
        assert!(create_input("").validate().is_err());
    }

    #[test]
    fn test_new_task_defaults_to_not_completed() {
        let task = Task::new(create_input("Write report"));
        assert!(!task.is_completed);
    }

    #[test]
    fn test_new_task_honors_explicit_flag() {
        let mut input = create_input("Already done");
        input.is_completed = Some(true);
        let task = Task::new(input);
        assert!(task.is_completed);
    }

    #[test]
    fn test_apply_update_replaces_mutable_fields() {
        let mut task = Task::new(create_input("Original"));
        let owner = task.user_id;

        task.apply_update(UpdateTask {
            title: "Updated".to_string(),
            description: Some("New description".to_string()),
            is_completed: true,
        });

        assert_eq!(task.title, "Updated");
        assert_eq!(task.description.as_deref(), Some("New description"));
        assert!(task.is_completed);
        assert_eq!(task.user_id, owner, "ownership must not change");
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let task = Task::new(create_input("Serialize me"));
        let json = serde_json::to_value(&task).unwrap();

        assert!(json.get("isCompleted").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("is_completed").is_none());
    }
}
