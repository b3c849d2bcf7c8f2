use utoipa::OpenApi;

/// Combined API documentation for the todo backend.
///
/// Each domain crate owns its own `ApiDoc`; this nests them under the
/// paths where `api::routes` mounts the corresponding routers.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "Task-management API: users and their tasks"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/tasks", api = domain_tasks::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
