//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the tag codec
//! - `schema.rs`: SQL DDL for initializing the database
//! - `sqlite.rs`: the credential store itself

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Credential, NewCredential};
pub use schema::SQLITE_INIT;
pub use sqlite::{CredentialsStorage, SqlitePool};
