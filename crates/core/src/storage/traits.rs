use async_trait::async_trait;

use crate::task::{Task, TaskDraft, TaskPatch};

use super::Result;

/// Repository for task records.
///
/// Every operation distinguishes found (`Ok(Some(_))`), not found (`Ok(None)`)
/// and failed (`Err(_)`). Implementations perform no retries.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Gets a task by its ID.
    async fn get_task(&self, id: &str) -> Result<Option<Task>>;

    /// Lists every task in the collection.
    ///
    /// Pages are read until the store reports no continuation. The result is
    /// not isolated from concurrent writers.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Creates a task from a draft, minting its ID.
    async fn create_task(&self, draft: TaskDraft) -> Result<Task>;

    /// Replaces the mutable fields of an existing task.
    ///
    /// Returns `Ok(None)` when no task exists under `id`; nothing is written
    /// in that case.
    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>>;

    /// Deletes a task, returning its contents prior to deletion.
    async fn delete_task(&self, id: &str) -> Result<Option<Task>>;
}
