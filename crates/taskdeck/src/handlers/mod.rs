pub mod api_key;
pub mod tasks;
