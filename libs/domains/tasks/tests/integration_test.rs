//! Integration tests for Tasks domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Database queries work correctly
//! - The user_id foreign key is enforced
//! - Cascade delete removes a user's tasks
//! - Partial (status-only) updates leave other columns untouched

use domain_tasks::*;
use domain_users::{CreateUser, PgUserRepository, UserRepository, UserService};
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};
use uuid::Uuid;

async fn create_owner(db: &TestDatabase, test_name: &str) -> domain_users::User {
    let builder = TestDataBuilder::from_test_name(test_name);
    let repo = PgUserRepository::new(db.connection());
    repo.create(CreateUser {
        name: "Owner".to_string(),
        email: builder.email("owner"),
    })
    .await
    .unwrap()
}

fn create_input(title: &str, user_id: Uuid) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        is_completed: None,
        user_id,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_task() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "create_and_get").await;
    let repo = PgTaskRepository::new(db.connection());

    let input = CreateTask {
        title: "Integration task".to_string(),
        description: Some("With a description".to_string()),
        is_completed: None,
        user_id: owner.id,
    };

    let created = repo.create(input).await.unwrap();

    assert_eq!(created.title, "Integration task");
    assert!(!created.is_completed, "flag defaults to false");
    assert_uuid_eq(created.user_id, owner.id, "task owner");

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "task should exist");

    assert_uuid_eq(retrieved.id, created.id, "retrieved task id");
    assert_eq!(retrieved.description.as_deref(), Some("With a description"));
}

#[tokio::test]
async fn test_foreign_key_rejects_missing_user() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());

    // Insert directly against the repository, bypassing the service's
    // owner check, so only the FK constraint stands in the way
    let missing_user = Uuid::new_v4();
    let result = repo.create(create_input("Orphan", missing_user)).await;

    assert!(
        matches!(result, Err(TaskError::UserNotFound(id)) if id == missing_user),
        "Expected UserNotFound error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_update_status_leaves_other_columns() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "update_status").await;
    let repo = PgTaskRepository::new(db.connection());

    let created = repo
        .create(CreateTask {
            title: "Untouched title".to_string(),
            description: Some("Untouched description".to_string()),
            is_completed: None,
            user_id: owner.id,
        })
        .await
        .unwrap();

    let updated = repo.update_status(created.id, true).await.unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.title, "Untouched title");
    assert_eq!(
        updated.description.as_deref(),
        Some("Untouched description")
    );
    assert_uuid_eq(updated.user_id, owner.id, "owner after status update");
}

#[tokio::test]
async fn test_update_task_preserves_ownership() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "update_ownership").await;
    let repo = PgTaskRepository::new(db.connection());

    let created = repo
        .create(create_input("Original", owner.id))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateTask {
                title: "Rewritten".to_string(),
                description: Some("Now with text".to_string()),
                is_completed: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Rewritten");
    assert!(updated.is_completed);
    assert_uuid_eq(updated.user_id, owner.id, "owner after full update");
}

#[tokio::test]
async fn test_update_missing_task_returns_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgTaskRepository::new(db.connection());

    let missing_id = Uuid::new_v4();
    let result = repo
        .update(
            missing_id,
            UpdateTask {
                title: "Ghost".to_string(),
                description: None,
                is_completed: false,
            },
        )
        .await;

    assert!(
        matches!(result, Err(TaskError::NotFound(id)) if id == missing_id),
        "Expected NotFound error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_delete_task() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "delete").await;
    let repo = PgTaskRepository::new(db.connection());

    let created = repo
        .create(create_input("To delete", owner.id))
        .await
        .unwrap();

    let deleted = repo.delete(created.id).await.unwrap();
    assert!(deleted, "delete should return true");

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    assert!(retrieved.is_none(), "task should be deleted");

    let deleted_again = repo.delete(created.id).await.unwrap();
    assert!(!deleted_again, "second delete should return false");
}

#[tokio::test]
async fn test_cascade_delete_removes_users_tasks() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "cascade_delete").await;
    let user_repo = PgUserRepository::new(db.connection());
    let task_repo = PgTaskRepository::new(db.connection());

    for i in 0..3 {
        task_repo
            .create(create_input(&format!("Task {}", i), owner.id))
            .await
            .unwrap();
    }

    assert_eq!(task_repo.list_by_user(owner.id).await.unwrap().len(), 3);

    // Deleting the owner must remove the tasks through the FK cascade
    let deleted = user_repo.delete(owner.id).await.unwrap();
    assert!(deleted);

    let remaining = task_repo.list_by_user(owner.id).await.unwrap();
    assert!(remaining.is_empty(), "cascade should remove owned tasks");

    // The service no longer knows the owner, so listing by that id is
    // UserNotFound rather than an empty list
    let user_service = UserService::new(PgUserRepository::new(db.connection()));
    let service = TaskService::new(PgTaskRepository::new(db.connection()), user_service);

    let result = service.list_tasks_by_user(owner.id).await;
    assert!(
        matches!(result, Err(TaskError::UserNotFound(id)) if id == owner.id),
        "Expected UserNotFound after owner delete, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_list_tasks_in_creation_order() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "list_order").await;
    let repo = PgTaskRepository::new(db.connection());

    let mut created_ids = vec![];
    for i in 0..3 {
        let task = repo
            .create(create_input(&format!("Task {}", i), owner.id))
            .await
            .unwrap();
        created_ids.push(task.id);
    }

    let tasks = repo.list().await.unwrap();
    let listed_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();

    assert_eq!(listed_ids, created_ids, "tasks should list in creation order");
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_service_checks_owner_before_listing() {
    let db = TestDatabase::new().await;
    let user_service = UserService::new(PgUserRepository::new(db.connection()));
    let service = TaskService::new(PgTaskRepository::new(db.connection()), user_service);

    let missing_user = Uuid::new_v4();
    let result = service.list_tasks_by_user(missing_user).await;

    assert!(
        matches!(result, Err(TaskError::UserNotFound(id)) if id == missing_user),
        "Expected UserNotFound error, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_service_lists_empty_for_existing_user() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "service_empty_list").await;
    let user_service = UserService::new(PgUserRepository::new(db.connection()));
    let service = TaskService::new(PgTaskRepository::new(db.connection()), user_service);

    let tasks = service.list_tasks_by_user(owner.id).await.unwrap();
    assert!(tasks.is_empty(), "existing user with no tasks lists empty");
}

#[tokio::test]
async fn test_service_delete_missing_returns_not_found() {
    let db = TestDatabase::new().await;
    let user_service = UserService::new(PgUserRepository::new(db.connection()));
    let service = TaskService::new(PgTaskRepository::new(db.connection()), user_service);

    let missing_id = Uuid::new_v4();
    let result = service.delete_task(missing_id).await;

    assert!(
        matches!(result, Err(TaskError::NotFound(id)) if id == missing_id),
        "Expected NotFound error, got {:?}",
        result
    );
}

// ============================================================================
// Concurrent Operations Tests
// ============================================================================

#[tokio::test]
async fn test_concurrent_creates_for_one_user() {
    let db = TestDatabase::new().await;
    let owner = create_owner(&db, "concurrent").await;
    let repo = PgTaskRepository::new(db.connection());

    let mut handles = vec![];
    for i in 0..5 {
        let repo_clone = PgTaskRepository::new(db.connection());
        let user_id = owner.id;

        let handle = tokio::spawn(async move {
            repo_clone
                .create(CreateTask {
                    title: format!("Concurrent {}", i),
                    description: None,
                    is_completed: None,
                    user_id,
                })
                .await
        });

        handles.push(handle);
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.len(), 5);
    for result in results {
        assert!(result.is_ok(), "concurrent create should succeed");
    }

    let all_tasks = repo.list_by_user(owner.id).await.unwrap();
    assert_eq!(all_tasks.len(), 5, "all tasks should be created");
}
