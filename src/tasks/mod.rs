//! Task records, their request validation, and persistence.

pub mod store;
pub mod types;

pub use store::{SqliteTaskStore, TaskStore};
pub use types::{NewTask, Task, TaskInput, TaskPatch, TaskStatus};
