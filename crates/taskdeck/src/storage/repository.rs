//! Task repository over any [`ItemTable`].

use async_trait::async_trait;
use uuid::Uuid;

use taskdeck_core::storage::{RepositoryError, Result, TaskRepository};
use taskdeck_core::task::{Task, TaskDraft, TaskPatch};

use super::conversions::{item_to_task, items_to_tasks, task_key, task_to_item, task_update};
use super::table::{ItemTable, WriteOutcome};

/// Task repository backed by a single key-value table.
///
/// Generated ids are UUID v4 strings. Listing drains every scan page, so the
/// returned collection is complete no matter how the store paginates.
pub struct TableTaskRepository<T> {
    table: T,
}

impl<T: ItemTable> TableTaskRepository<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }
}

#[async_trait]
impl<T: ItemTable> TaskRepository for TableTaskRepository<T> {
    async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let key = task_key(id)?;
        self.table
            .get_item(key)
            .await?
            .map(|item| item_to_task(&item))
            .transpose()
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = Vec::new();
        let mut start_key = None;
        let mut pages = 0usize;

        loop {
            let page = self.table.scan_page(start_key).await?;
            pages += 1;
            tasks.extend(items_to_tasks(&page.items)?);

            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        tracing::debug!(count = tasks.len(), pages, "Listed tasks");
        Ok(tasks)
    }

    async fn create_task(&self, draft: TaskDraft) -> Result<Task> {
        let task = draft.into_task(Uuid::new_v4().to_string());
        let item = task_to_item(&task)?;

        if self.table.put_item(item).await?.is_some() {
            tracing::warn!(id = %task.id, "Create replaced an existing task");
        }

        tracing::debug!(id = %task.id, "Created task");
        Ok(task)
    }

    async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>> {
        let key = task_key(id)?;

        match self.table.update_item(key, task_update(id, &patch)).await? {
            WriteOutcome::Applied(item) if item.is_empty() => Err(RepositoryError::Store(
                "Update returned no attributes".to_string(),
            )),
            WriteOutcome::Applied(item) => item_to_task(&item).map(Some),
            WriteOutcome::PreconditionFailed => {
                tracing::debug!(id, "Update skipped, task does not exist");
                Ok(None)
            }
        }
    }

    async fn delete_task(&self, id: &str) -> Result<Option<Task>> {
        let key = task_key(id)?;
        self.table
            .delete_item(key, true)
            .await?
            .map(|item| item_to_task(&item))
            .transpose()
    }
}
