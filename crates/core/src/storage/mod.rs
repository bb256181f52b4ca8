mod error;
mod http_mapping;
mod layout;
mod traits;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use layout::{
    task_attributes, StoredValue, ATTR_COMPLETED_ON, ATTR_CONTENT, ATTR_ID, ATTR_STATUS,
};
pub use traits::TaskRepository;
