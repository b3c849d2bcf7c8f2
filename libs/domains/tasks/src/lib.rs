//! Task domain
//!
//! Tasks are the unit of work in the system. Every task belongs to a
//! user; deleting the owner removes the task (cascade). The crate
//! follows the same layered layout as the users domain:
//!
//! ```text
//! handlers  →  service  →  repository  →  entity / database
//! (HTTP)       (rules)     (storage)       (Sea-ORM)
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use models::{CreateTask, Task, UpdateTask, UpdateTaskStatus};
pub use postgres::PgTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
