mod error;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use operations::{validate_content, MAX_CONTENT_BYTES};
pub use requests::{CreateTaskRequest, TaskDraft, TaskPatch, UpdateTaskRequest};
pub use types::{Task, TaskStatus};
