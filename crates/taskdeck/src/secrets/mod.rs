//! Secret lookup backends.
//!
//! Implementations of `taskdeck_core::secrets::SecretLookup`, selected at
//! startup with `SECRETS_BACKEND`.

mod env;
mod secretsmanager;

pub use env::EnvSecretLookup;
pub use secretsmanager::SecretsManagerLookup;
