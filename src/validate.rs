//! Length policy applied to a credential before it is stored.

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPolicy {
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub username_min_length: usize,
    pub username_max_length: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            password_min_length: 8,
            password_max_length: 64,
            username_min_length: 3,
            username_max_length: 32,
        }
    }
}

impl CredentialPolicy {
    /// Check password then username; only the first violation is reported.
    pub fn validate(&self, username: &str, password: &str) -> Result<(), VaultError> {
        if !within(password, self.password_min_length, self.password_max_length) {
            return Err(VaultError::InvalidPassword);
        }
        if !within(username, self.username_min_length, self.username_max_length) {
            return Err(VaultError::InvalidUsername);
        }
        Ok(())
    }
}

/// Bounds apply to the UTF-8 byte length.
fn within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len())
}
