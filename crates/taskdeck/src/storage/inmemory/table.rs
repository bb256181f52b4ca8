//! In-memory item table.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use taskdeck_core::storage::{RepositoryError, Result, ATTR_ID};

use crate::storage::table::{Item, ItemTable, ItemUpdate, ScanPage, WriteOutcome};

/// Default number of items returned per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// In-memory table keyed by a single string partition key.
///
/// Mirrors the DynamoDB behaviour the task repository relies on: scans are
/// bounded to `page_size` items and report a `last_evaluated_key` whenever a
/// page is full, and conditional updates are evaluated atomically.
/// Data is not persisted and will be lost when the table is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryTable {
    items: Arc<RwLock<BTreeMap<String, Item>>>,
    key_attribute: String,
    page_size: usize,
}

impl Default for InMemoryTable {
    fn default() -> Self {
        Self::new(ATTR_ID)
    }
}

impl InMemoryTable {
    /// Creates an empty table whose partition key is `key_attribute`.
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            key_attribute: key_attribute.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the maximum number of items per scan page. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of stored items.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    fn key_of(&self, item: &Item) -> Result<String> {
        item.get(&self.key_attribute)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::Store(format!(
                    "Item is missing key attribute {}",
                    self.key_attribute
                ))
            })
    }

    fn key_item(&self, key: &str) -> Item {
        let mut item = Item::new();
        item.insert(
            self.key_attribute.clone(),
            aws_sdk_dynamodb::types::AttributeValue::S(key.to_string()),
        );
        item
    }
}

#[async_trait]
impl ItemTable for InMemoryTable {
    async fn get_item(&self, key: Item) -> Result<Option<Item>> {
        let key = self.key_of(&key)?;
        let items = self.items.read().await;
        Ok(items.get(&key).cloned())
    }

    async fn put_item(&self, item: Item) -> Result<Option<Item>> {
        let key = self.key_of(&item)?;
        let mut items = self.items.write().await;
        Ok(items.insert(key, item))
    }

    async fn update_item(&self, key: Item, update: ItemUpdate) -> Result<WriteOutcome<Item>> {
        let key_value = self.key_of(&key)?;
        let mut items = self.items.write().await;

        if let Some((name, expected)) = &update.condition {
            let holds = items
                .get(&key_value)
                .and_then(|item| item.get(name))
                .is_some_and(|actual| actual == expected);
            if !holds {
                return Ok(WriteOutcome::PreconditionFailed);
            }
        }

        let item = items.entry(key_value).or_insert(key);
        for (name, value) in update.set {
            item.insert(name, value);
        }

        Ok(WriteOutcome::Applied(item.clone()))
    }

    async fn delete_item(&self, key: Item, return_previous: bool) -> Result<Option<Item>> {
        let key = self.key_of(&key)?;
        let mut items = self.items.write().await;
        let previous = items.remove(&key);
        Ok(previous.filter(|_| return_previous))
    }

    async fn scan_page(&self, start_key: Option<Item>) -> Result<ScanPage> {
        let lower = match &start_key {
            Some(start) => Bound::Excluded(self.key_of(start)?),
            None => Bound::Unbounded,
        };

        let items = self.items.read().await;
        let page: Vec<(&String, &Item)> = items
            .range((lower, Bound::Unbounded))
            .take(self.page_size)
            .collect();

        // A full page always carries a continuation, even if nothing follows.
        let last_evaluated_key = if page.len() == self.page_size {
            page.last().map(|(key, _)| self.key_item(key))
        } else {
            None
        };

        Ok(ScanPage {
            items: page.into_iter().map(|(_, item)| item.clone()).collect(),
            last_evaluated_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;

    fn item(id: &str, content: &str) -> Item {
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::S(id.to_string()));
        item.insert("content".to_string(), AttributeValue::S(content.to_string()));
        item
    }

    fn key(id: &str) -> Item {
        let mut key = Item::new();
        key.insert("id".to_string(), AttributeValue::S(id.to_string()));
        key
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let table = InMemoryTable::default();

        let previous = table.put_item(item("a", "first")).await.unwrap();
        assert!(previous.is_none());

        let stored = table.get_item(key("a")).await.unwrap();
        assert_eq!(stored, Some(item("a", "first")));
    }

    #[tokio::test]
    async fn test_put_returns_replaced_item() {
        let table = InMemoryTable::default();
        table.put_item(item("a", "first")).await.unwrap();

        let previous = table.put_item(item("a", "second")).await.unwrap();

        assert_eq!(previous, Some(item("a", "first")));
        assert_eq!(table.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let table = InMemoryTable::default();
        assert_eq!(table.get_item(key("nope")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_item_without_key_is_rejected() {
        let table = InMemoryTable::default();
        let result = table.put_item(Item::new()).await;
        assert!(matches!(result, Err(RepositoryError::Store(_))));
    }

    #[tokio::test]
    async fn test_conditional_update_applies() {
        let table = InMemoryTable::default();
        table.put_item(item("a", "first")).await.unwrap();

        let update = ItemUpdate::new()
            .set("content", AttributeValue::S("second".to_string()))
            .require_equal("id", AttributeValue::S("a".to_string()));
        let outcome = table.update_item(key("a"), update).await.unwrap();

        assert_eq!(outcome, WriteOutcome::Applied(item("a", "second")));
    }

    #[tokio::test]
    async fn test_conditional_update_on_missing_item_fails_without_writing() {
        let table = InMemoryTable::default();

        let update = ItemUpdate::new()
            .set("content", AttributeValue::S("second".to_string()))
            .require_equal("id", AttributeValue::S("a".to_string()));
        let outcome = table.update_item(key("a"), update).await.unwrap();

        assert_eq!(outcome, WriteOutcome::PreconditionFailed);
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_unconditional_update_creates_item() {
        let table = InMemoryTable::default();

        let update = ItemUpdate::new().set("content", AttributeValue::S("new".to_string()));
        let outcome = table.update_item(key("a"), update).await.unwrap();

        assert_eq!(outcome, WriteOutcome::Applied(item("a", "new")));
    }

    #[tokio::test]
    async fn test_delete_returns_previous_when_asked() {
        let table = InMemoryTable::default();
        table.put_item(item("a", "first")).await.unwrap();
        table.put_item(item("b", "second")).await.unwrap();

        assert_eq!(
            table.delete_item(key("a"), true).await.unwrap(),
            Some(item("a", "first"))
        );
        assert_eq!(table.delete_item(key("b"), false).await.unwrap(), None);
        assert_eq!(table.delete_item(key("a"), true).await.unwrap(), None);
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_scan_pages() {
        let table = InMemoryTable::default().with_page_size(2);
        for id in ["a", "b", "c"] {
            table.put_item(item(id, id)).await.unwrap();
        }

        let first = table.scan_page(None).await.unwrap();
        assert_eq!(first.items, vec![item("a", "a"), item("b", "b")]);
        assert_eq!(first.last_evaluated_key, Some(key("b")));

        let second = table.scan_page(first.last_evaluated_key).await.unwrap();
        assert_eq!(second.items, vec![item("c", "c")]);
        assert_eq!(second.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_full_last_page_reports_continuation() {
        let table = InMemoryTable::default().with_page_size(2);
        for id in ["a", "b"] {
            table.put_item(item(id, id)).await.unwrap();
        }

        let first = table.scan_page(None).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.last_evaluated_key, Some(key("b")));

        let second = table.scan_page(first.last_evaluated_key).await.unwrap();
        assert!(second.items.is_empty());
        assert_eq!(second.last_evaluated_key, None);
    }

    #[tokio::test]
    async fn test_scan_empty_table() {
        let table = InMemoryTable::default();
        assert_eq!(table.scan_page(None).await.unwrap(), ScanPage::default());
    }
}
