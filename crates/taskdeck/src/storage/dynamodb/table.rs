//! DynamoDB item table.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::ReturnValue;
use aws_sdk_dynamodb::Client;

use taskdeck_core::storage::Result;

use super::error::{
    classify_update_item_error, map_delete_item_error, map_get_item_error, map_put_item_error,
    map_scan_error,
};
use crate::storage::table::{Item, ItemTable, ItemUpdate, ScanPage, WriteOutcome};

/// DynamoDB-backed [`ItemTable`].
///
/// Each operation is a single request. Throttling and service faults surface
/// as `RepositoryError::Store`; nothing is retried here beyond what the SDK
/// itself does.
#[derive(Debug, Clone)]
pub struct DynamoDbTable {
    client: Client,
    table_name: String,
    page_size: Option<i32>,
}

impl DynamoDbTable {
    /// Creates a table handle with the given client and table name.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            page_size: None,
        }
    }

    /// Creates a table handle from a loaded AWS configuration.
    pub fn from_config(config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self::new(Client::new(config), table_name)
    }

    /// Caps the number of items evaluated per scan request.
    pub fn with_page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size;
        self
    }
}

#[async_trait]
impl ItemTable for DynamoDbTable {
    async fn get_item(&self, key: Item) -> Result<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(map_get_item_error)?;

        Ok(output.item)
    }

    async fn put_item(&self, item: Item) -> Result<Option<Item>> {
        let output = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(non_empty(output.attributes))
    }

    async fn update_item(&self, key: Item, update: ItemUpdate) -> Result<WriteOutcome<Item>> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .update_expression(update.update_expression())
            .set_condition_expression(update.condition_expression())
            .set_expression_attribute_names(Some(update.expression_attribute_names()))
            .set_expression_attribute_values(Some(update.expression_attribute_values()))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => Ok(WriteOutcome::Applied(output.attributes.unwrap_or_default())),
            Err(err) => classify_update_item_error(err),
        }
    }

    async fn delete_item(&self, key: Item, return_previous: bool) -> Result<Option<Item>> {
        let return_values = if return_previous {
            ReturnValue::AllOld
        } else {
            ReturnValue::None
        };

        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key))
            .return_values(return_values)
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(non_empty(output.attributes))
    }

    async fn scan_page(&self, start_key: Option<Item>) -> Result<ScanPage> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .set_exclusive_start_key(start_key)
            .set_limit(self.page_size)
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(ScanPage {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: non_empty(output.last_evaluated_key),
        })
    }
}

/// DynamoDB may answer with an empty map where there is nothing to return.
fn non_empty(item: Option<Item>) -> Option<Item> {
    item.filter(|item| !item.is_empty())
}
