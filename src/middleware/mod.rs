pub mod extract;

pub use extract::{CredentialId, JsonBody};
