//! Password hashing with bcrypt.

use bcrypt::{hash, verify};

use crate::errors::AppError;

/// bcrypt work factor used for every stored password.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, HASH_COST)?)
}

/// Returns `Ok(false)` on mismatch; errors only when the stored hash is unreadable.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed)?)
}
