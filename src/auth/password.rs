//! Password hashing utilities
//!
//! Hashing happens at the REST boundary; the service and persistence layers
//! treat the credential as an opaque string.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("qwerty").unwrap();

        assert!(verify_password("qwerty", &hashed).unwrap());
        assert!(!verify_password("trewq", &hashed).unwrap());
    }
}
