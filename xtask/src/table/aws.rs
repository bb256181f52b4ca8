//! DynamoDB calls made by the xtask commands.

use std::time::Duration;

use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use taskdeck_core::storage::ATTR_ID;

use super::error::{aws, Result, XtaskError};
use super::plan::Observed;

const ACTIVE_POLLS: u32 = 60;
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Builds a client from the usual AWS environment. `AWS_ENDPOINT_URL` points
/// it at DynamoDB Local.
pub async fn connect() -> (Client, String) {
    let region = RegionProviderChain::default_provider().or_else("us-east-1");
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .load()
        .await;

    let target = match config.endpoint_url() {
        Some(url) => format!("DynamoDB at {url}"),
        None => format!(
            "DynamoDB in {}",
            config.region().map(|r| r.as_ref()).unwrap_or("us-east-1")
        ),
    };
    (Client::new(&config), target)
}

pub async fn describe(client: &Client, table: &str) -> Result<Option<Observed>> {
    let output = match client.describe_table().table_name(table).send().await {
        Ok(output) => output,
        Err(err) => {
            return match err.into_service_error() {
                DescribeTableError::ResourceNotFoundException(_) => Ok(None),
                other => Err(aws(other)),
            }
        }
    };

    let Some(description) = output.table() else {
        return Ok(None);
    };
    let key_named = |kind: KeyType| {
        description
            .key_schema()
            .iter()
            .find(|key| key.key_type() == &kind)
            .map(|key| key.attribute_name().to_string())
    };

    Ok(Some(Observed {
        active: description.table_status() == Some(&TableStatus::Active),
        hash_key: key_named(KeyType::Hash),
        range_key: key_named(KeyType::Range),
    }))
}

/// Creates the table keyed on the task id, with on-demand billing.
pub async fn create(client: &Client, table: &str) -> Result<()> {
    let key = KeySchemaElement::builder()
        .attribute_name(ATTR_ID)
        .key_type(KeyType::Hash)
        .build()
        .map_err(aws)?;
    let attribute = AttributeDefinition::builder()
        .attribute_name(ATTR_ID)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(aws)?;

    client
        .create_table()
        .table_name(table)
        .key_schema(key)
        .attribute_definitions(attribute)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await
        .map_err(aws)?;
    Ok(())
}

pub async fn delete(client: &Client, table: &str) -> Result<()> {
    client
        .delete_table()
        .table_name(table)
        .send()
        .await
        .map_err(aws)?;
    Ok(())
}

pub async fn wait_until_active(client: &Client, table: &str) -> Result<()> {
    for _ in 0..ACTIVE_POLLS {
        if describe(client, table).await?.is_some_and(|t| t.active) {
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    Err(XtaskError::NotActive(table.to_string()))
}
