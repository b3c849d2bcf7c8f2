use axum::Router;

pub mod health;
pub mod tasks;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Takes a reference to AppState and initializes all domain services.
/// Returns a stateless Router (all sub-routers have state already
/// applied); only cheap connection-pool clones remain.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/users", users::router(state))
        .nest("/tasks", tasks::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless
/// app router from `create_router`. The /ready endpoint pings the
/// database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
