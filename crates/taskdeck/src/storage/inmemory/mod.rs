//! In-memory storage backend.
//!
//! This module provides an in-memory implementation of [`ItemTable`] that keeps
//! items in a `BTreeMap` wrapped in `Arc<RwLock<_>>`. It backs local runs
//! without DynamoDB and the repository tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::{InMemoryTable, TableTaskRepository};
//!
//! let repo = TableTaskRepository::new(InMemoryTable::default().with_page_size(10));
//! ```
//!
//! [`ItemTable`]: crate::storage::table::ItemTable

mod table;

pub use table::InMemoryTable;
