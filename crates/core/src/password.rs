//! Argon2 password hashing.

use crate::{EazydocError, EazydocResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};

/// Hash `password` with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> EazydocResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EazydocError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch; errors are reserved for unparseable hashes.
#[cfg(test)]
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> EazydocResult<bool> {
    use argon2::{PasswordHash, PasswordVerifier};

    let parsed =
        PasswordHash::new(stored_hash).map_err(|e| EazydocError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(EazydocError::PasswordHash(e.to_string())),
    }
}
