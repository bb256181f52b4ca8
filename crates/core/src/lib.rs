//! Core types and pure logic for taskdeck.
//!
//! Everything here is free of I/O: task types and validation, the repository
//! and secret lookup traits, and the HTTP mapping used by the server crate.

pub mod http;
pub mod secrets;
pub mod storage;
pub mod task;
