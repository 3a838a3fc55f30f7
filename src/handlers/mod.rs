pub mod credentials;
pub mod health;

pub use credentials::{
    ApiMessage, create_credential, delete_credential, get_credential, list_credentials,
    update_credential,
};
pub use health::health_handler;
