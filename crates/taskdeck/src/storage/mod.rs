//! Task storage.
//!
//! [`TableTaskRepository`] implements `taskdeck_core::storage::TaskRepository`
//! over any [`ItemTable`](table::ItemTable). Two tables are available and selected at startup
//! with `STORAGE_BACKEND`:
//!
//! - `dynamodb` (default): [`DynamoDbTable`] using `aws-sdk-dynamodb`
//! - `memory`: [`InMemoryTable`], for local runs and tests

mod conversions;
pub mod dynamodb;
pub mod inmemory;
mod repository;
mod table;

pub use dynamodb::DynamoDbTable;
pub use inmemory::InMemoryTable;
pub use repository::TableTaskRepository;
