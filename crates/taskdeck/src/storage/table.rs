//! Item-level access to the task table.
//!
//! [`ItemTable`] is the seam between the task repository and a concrete key-value
//! store. Items use DynamoDB's attribute representation regardless of backend.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use taskdeck_core::storage::Result;

/// A single stored item: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;

/// One page of a table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Item>,
    /// Where the next page starts. `None` once the scan is exhausted.
    pub last_evaluated_key: Option<Item>,
}

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOutcome<T> {
    /// The condition held; carries the item as it is after the write.
    Applied(T),
    /// The store rejected the write because the condition did not hold.
    PreconditionFailed,
}

/// An atomic attribute update with an optional equality precondition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemUpdate {
    pub set: Vec<(String, AttributeValue)>,
    pub condition: Option<(String, AttributeValue)>,
}

impl ItemUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    pub fn set(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.set.push((name.into(), value));
        self
    }

    /// Only apply the update if the stored `name` equals `value`.
    ///
    /// An absent item never satisfies the condition.
    pub fn require_equal(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.condition = Some((name.into(), value));
        self
    }

    /// `SET #a = :a, #b = :b`
    pub fn update_expression(&self) -> String {
        let assignments: Vec<String> = self
            .set
            .iter()
            .map(|(name, _)| format!("#{name} = :{name}"))
            .collect();
        format!("SET {}", assignments.join(", "))
    }

    /// `#a = :expected_a`
    pub fn condition_expression(&self) -> Option<String> {
        self.condition
            .as_ref()
            .map(|(name, _)| format!("#{name} = :expected_{name}"))
    }

    pub fn expression_attribute_names(&self) -> HashMap<String, String> {
        self.set
            .iter()
            .map(|(name, _)| name)
            .chain(self.condition.iter().map(|(name, _)| name))
            .map(|name| (format!("#{name}"), name.clone()))
            .collect()
    }

    pub fn expression_attribute_values(&self) -> HashMap<String, AttributeValue> {
        let mut values: HashMap<String, AttributeValue> = self
            .set
            .iter()
            .map(|(name, value)| (format!(":{name}"), value.clone()))
            .collect();
        if let Some((name, value)) = &self.condition {
            values.insert(format!(":expected_{name}"), value.clone());
        }
        values
    }
}

/// Key-value primitives over a single table.
///
/// Implementations map store faults to [`RepositoryError::Store`] and must not
/// retry.
///
/// [`RepositoryError::Store`]: taskdeck_core::storage::RepositoryError::Store
#[async_trait]
pub trait ItemTable: Send + Sync {
    /// Reads the item stored under `key`.
    async fn get_item(&self, key: Item) -> Result<Option<Item>>;

    /// Writes `item` unconditionally, returning the item it replaced.
    async fn put_item(&self, item: Item) -> Result<Option<Item>>;

    /// Applies `update` atomically, returning the item after the write.
    async fn update_item(&self, key: Item, update: ItemUpdate) -> Result<WriteOutcome<Item>>;

    /// Removes the item under `key`. When `return_previous` is set, returns
    /// what was deleted in the same request.
    async fn delete_item(&self, key: Item, return_previous: bool) -> Result<Option<Item>>;

    /// Reads one bounded page of the table, starting after `start_key`.
    async fn scan_page(&self, start_key: Option<Item>) -> Result<ScanPage>;
}
