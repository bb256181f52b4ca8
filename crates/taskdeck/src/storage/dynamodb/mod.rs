//! DynamoDB storage backend.
//!
//! Provides [`DynamoDbTable`], the [`ItemTable`](crate::storage::table::ItemTable)
//! implementation over `aws-sdk-dynamodb`, and the mapping from SDK errors to
//! `RepositoryError`.

mod error;
mod table;

pub use table::DynamoDbTable;
