//! Attribute layout of a stored task.
//!
//! Everything that writes task items (the server and the seeding tool) builds
//! them from [`task_attributes`], so the two can never disagree on names or
//! attribute types.

use crate::task::Task;

pub const ATTR_ID: &str = "id";
pub const ATTR_CONTENT: &str = "content";
/// `status` is a DynamoDB reserved word, so the attribute is stored as `taskStatus`.
pub const ATTR_STATUS: &str = "taskStatus";
pub const ATTR_COMPLETED_ON: &str = "completedOn";

/// A scalar attribute value, independent of any storage SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredValue {
    /// String attribute.
    S(String),
    /// Number attribute, in its decimal text form.
    N(String),
}

/// The attributes stored for `task`, key first.
pub fn task_attributes(task: &Task) -> [(&'static str, StoredValue); 4] {
    [
        (ATTR_ID, StoredValue::S(task.id.clone())),
        (ATTR_CONTENT, StoredValue::S(task.content.clone())),
        (ATTR_STATUS, StoredValue::S(task.status.as_str().to_string())),
        (
            ATTR_COMPLETED_ON,
            StoredValue::N(task.completed_on.to_string()),
        ),
    ]
}
