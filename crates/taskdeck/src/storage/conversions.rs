//! Task attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and tasks.
//! These are testable in isolation without DynamoDB access.

use aws_sdk_dynamodb::types::AttributeValue;

use taskdeck_core::storage::{
    task_attributes, RepositoryError, StoredValue, ATTR_COMPLETED_ON, ATTR_CONTENT, ATTR_ID,
    ATTR_STATUS,
};
use taskdeck_core::task::{Task, TaskPatch, TaskStatus};

use super::table::{Item, ItemUpdate};

// ============================================================================
// Task conversions
// ============================================================================

/// Build the primary key item for a task id.
///
/// DynamoDB rejects empty key strings; any other id, whitespace included, is a
/// valid key that may simply not be stored.
pub fn task_key(id: &str) -> Result<Item, RepositoryError> {
    if id.is_empty() {
        return Err(RepositoryError::Encoding(
            "Task id cannot be empty".to_string(),
        ));
    }

    let mut key = Item::new();
    key.insert(ATTR_ID.to_string(), AttributeValue::S(id.to_string()));
    Ok(key)
}

/// Convert a Task to a DynamoDB item.
pub fn task_to_item(task: &Task) -> Result<Item, RepositoryError> {
    task_key(&task.id)?;

    Ok(task_attributes(task)
        .into_iter()
        .map(|(name, value)| (name.to_string(), attribute_value(value)))
        .collect())
}

/// Map a layout value to its DynamoDB representation.
fn attribute_value(value: StoredValue) -> AttributeValue {
    match value {
        StoredValue::S(s) => AttributeValue::S(s),
        StoredValue::N(n) => AttributeValue::N(n),
    }
}

/// Convert a DynamoDB item to a Task.
pub fn item_to_task(item: &Item) -> Result<Task, RepositoryError> {
    Ok(Task {
        id: get_string(item, ATTR_ID)?,
        content: get_string(item, ATTR_CONTENT)?,
        status: get_status(item, ATTR_STATUS)?,
        completed_on: get_u64(item, ATTR_COMPLETED_ON)?,
    })
}

/// Convert a list of DynamoDB items to Tasks, failing on the first bad item.
pub fn items_to_tasks(items: &[Item]) -> Result<Vec<Task>, RepositoryError> {
    items.iter().map(item_to_task).collect()
}

/// Build the conditional update that replaces a task's mutable fields.
///
/// The update only applies if an item whose `id` equals `id` is stored.
pub fn task_update(id: &str, patch: &TaskPatch) -> ItemUpdate {
    ItemUpdate::new()
        .set(ATTR_CONTENT, AttributeValue::S(patch.content.clone()))
        .set(
            ATTR_STATUS,
            AttributeValue::S(patch.status.as_str().to_string()),
        )
        .set(
            ATTR_COMPLETED_ON,
            AttributeValue::N(patch.completed_on.to_string()),
        )
        .require_equal(ATTR_ID, AttributeValue::S(id.to_string()))
}

// ============================================================================
// Helper functions
// ============================================================================

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::Encoding(format!("Missing or invalid field: {}", key)))
}

/// Get a required unsigned number attribute.
fn get_u64(item: &Item, key: &str) -> Result<u64, RepositoryError> {
    let n = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::Encoding(format!("Missing or invalid field: {}", key)))?;
    n.parse::<u64>()
        .map_err(|e| RepositoryError::Encoding(format!("Invalid number {}: {}", key, e)))
}

/// Get a required status attribute.
fn get_status(item: &Item, key: &str) -> Result<TaskStatus, RepositoryError> {
    let s = get_string(item, key)?;
    s.parse::<TaskStatus>()
        .map_err(|e| RepositoryError::Encoding(format!("Invalid {}: {}", key, e)))
}
