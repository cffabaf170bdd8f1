//! Password hashing for accounts created outside the sign-up flow.
//!
//! The web app checks logins with bcrypt, so seeded hashes must be bcrypt too.

use bcrypt::{hash, verify};

use crate::errors::ModelError;

/// Work factor used by the web app's sign-up flow.
pub const BCRYPT_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, ModelError> {
    hash(password, BCRYPT_COST).map_err(|e| ModelError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ModelError> {
    verify(password, hash).map_err(|e| ModelError::PasswordHash(e.to_string()))
}
