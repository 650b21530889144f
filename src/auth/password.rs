use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use rand::RngCore;

const SALT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id hashing with a fresh random salt per password.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }

    /// Hash a password into a PHC string suitable for storage.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let salt =
            SaltString::encode_b64(&salt).map_err(|err| PasswordError::Hash(err.to_string()))?;

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hash(err.to_string()))?;
        Ok(hash.to_string())
    }

    /// Returns false for a wrong password and for hashes that cannot be parsed.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_against_the_plain_password() {
        let service = PasswordService::new();
        let hash = service.hash("monsoon-2025").expect("hash succeeds");

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("monsoon-2025", &hash));
        assert!(!service.verify("monsoon-2024", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let service = PasswordService::new();
        let first = service.hash("same").expect("hash succeeds");
        let second = service.hash("same").expect("hash succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let service = PasswordService::new();
        assert!(!service.verify("anything", "not-a-phc-string"));
    }
}
