use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use domain_users::UserRepository;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, UpdateTask, UpdateTaskStatus};
use crate::repository::TaskRepository;
use crate::service::TaskService;

const TAG: &str = "tasks";

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        list_tasks_by_user,
        update_task_status,
    ),
    components(
        schemas(Task, CreateTask, UpdateTask, UpdateTaskStatus),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Task management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the task router with all HTTP endpoints
pub fn router<T, U>(service: TaskService<T, U>) -> Router
where
    T: TaskRepository + 'static,
    U: UserRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route(
            "/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/user/{id}", get(list_tasks_by_user))
        .route("/{id}/status", patch(update_task_status))
        .with_state(shared_service)
}

/// List all tasks
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.list_tasks().await?;
    Ok(Json(tasks))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    let task = service.get_task(id).await?;
    Ok(Json(task))
}

/// Update a task (full replacement of title, description, flag)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    let task = service.update_task(id, input).await?;
    Ok(Json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<impl IntoResponse> {
    service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all tasks owned by a user
#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "List of the user's tasks", body = Vec<Task>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks_by_user<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = service.list_tasks_by_user(id).await?;
    Ok(Json(tasks))
}

/// Update only the completion flag of a task
#[utoipa::path(
    patch,
    path = "/{id}/status",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTaskStatus,
    responses(
        (status = 200, description = "Task status updated successfully", body = Task),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task_status<T: TaskRepository, U: UserRepository>(
    State(service): State<Arc<TaskService<T, U>>>,
    UuidPath(id): UuidPath,
    Json(input): Json<UpdateTaskStatus>,
) -> TaskResult<Json<Task>> {
    let task = service.update_task_status(id, input.is_completed).await?;
    Ok(Json(task))
}
