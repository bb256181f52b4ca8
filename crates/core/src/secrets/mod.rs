mod error;
mod functions;
mod traits;

pub use error::SecretError;
pub use functions::{api_key_matches, require_secret_value};
pub use traits::{Result, SecretLookup};
