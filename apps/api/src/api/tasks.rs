use axum::Router;
use domain_tasks::{PgTaskRepository, TaskService, handlers};
use domain_users::{PgUserRepository, UserService};

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = PgTaskRepository::new(state.db.clone());
    // The task service verifies owners through the users service
    let user_service = UserService::new(PgUserRepository::new(state.db.clone()));
    let service = TaskService::new(repository, user_service);
    handlers::router(service)
}
