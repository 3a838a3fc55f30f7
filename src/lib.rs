pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod ui;
pub mod validate;

pub use config::Config;
pub use db::{Credential, CredentialsStorage, NewCredential};
pub use error::VaultError;
pub use validate::CredentialPolicy;
