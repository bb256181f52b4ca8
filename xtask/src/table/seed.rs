//! Sample task generation and batch insertion.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use taskdeck_core::storage::{task_attributes, StoredValue};
use taskdeck_core::task::{Task, TaskStatus};
use uuid::Uuid;

use super::error::{aws, Result, XtaskError};

/// BatchWriteItem takes at most 25 requests.
const BATCH_SIZE: usize = 25;
const MAX_BATCH_ATTEMPTS: u32 = 5;
const COMPLETION_WINDOW_SECS: i64 = 30 * 24 * 60 * 60;

const CHORES: [&str; 12] = [
    "Buy milk",
    "Review PR",
    "Send invoice",
    "Update documentation",
    "Book flights",
    "Reply to emails",
    "Water the plants",
    "Renew passport",
    "Call the dentist",
    "Pay electricity bill",
    "Back up laptop",
    "Plan sprint demo",
];

/// About a third of the tasks come out COMPLETED, finished some time in the
/// 30 days before `now`.
pub fn sample_tasks(count: u32, now: DateTime<Utc>, rng: &mut impl Rng) -> Vec<Task> {
    (0..count)
        .map(|_| {
            let content = CHORES.choose(rng).copied().unwrap_or("Sample task");
            let (status, completed_on) = if rng.random_bool(1.0 / 3.0) {
                let finished = now.timestamp() - rng.random_range(0..COMPLETION_WINDOW_SECS);
                (TaskStatus::Completed, finished.max(0) as u64)
            } else {
                (TaskStatus::Pending, 0)
            };

            Task {
                id: Uuid::new_v4().to_string(),
                content: content.to_string(),
                status,
                completed_on,
            }
        })
        .collect()
}

fn task_item(task: &Task) -> HashMap<String, AttributeValue> {
    task_attributes(task)
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                StoredValue::S(s) => AttributeValue::S(s),
                StoredValue::N(n) => AttributeValue::N(n),
            };
            (name.to_string(), value)
        })
        .collect()
}

/// Writes `tasks` in batches, resubmitting whatever DynamoDB reports as
/// unprocessed with exponential backoff.
pub async fn insert(client: &Client, table: &str, tasks: &[Task]) -> Result<usize> {
    for batch in tasks.chunks(BATCH_SIZE) {
        let mut pending = batch
            .iter()
            .map(|task| {
                let put = PutRequest::builder()
                    .set_item(Some(task_item(task)))
                    .build()
                    .map_err(aws)?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        let mut attempts = 0;
        while !pending.is_empty() {
            if attempts == MAX_BATCH_ATTEMPTS {
                return Err(XtaskError::Unprocessed {
                    remaining: pending.len(),
                    attempts,
                });
            }
            if attempts > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(100 << attempts)).await;
            }
            attempts += 1;

            let output = client
                .batch_write_item()
                .request_items(table, pending)
                .send()
                .await
                .map_err(aws)?;
            pending = output
                .unprocessed_items
                .and_then(|mut unprocessed| unprocessed.remove(table))
                .unwrap_or_default();
        }
    }

    Ok(tasks.len())
}
