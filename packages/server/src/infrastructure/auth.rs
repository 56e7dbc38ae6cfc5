//! Argon2 verification of administrative secrets.
//!
//! Credentials are PHC strings (`$argon2id$v=19$...`) supplied by the
//! operator; the plaintext never appears in configuration.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};

use crate::domain::SecretVerifier;

/// Verifies candidates against one Argon2 PHC hash.
///
/// `argon2` compares the derived hash in constant time. With no hash
/// configured every candidate is rejected, which disables the action.
pub struct Argon2SecretVerifier {
    phc_hash: Option<String>,
}

impl Argon2SecretVerifier {
    /// Validates the PHC string up front so a typo fails at startup rather
    /// than on the first admin attempt.
    pub fn new(phc_hash: Option<String>) -> Result<Self, password_hash::Error> {
        if let Some(hash) = &phc_hash {
            PasswordHash::new(hash)?;
        }
        Ok(Self { phc_hash })
    }

    pub fn disabled() -> Self {
        Self { phc_hash: None }
    }

    pub fn is_configured(&self) -> bool {
        self.phc_hash.is_some()
    }
}

impl SecretVerifier for Argon2SecretVerifier {
    fn verify(&self, candidate: &str) -> bool {
        let Some(hash) = &self.phc_hash else {
            tracing::warn!("Admin secret is not configured; rejecting");
            return false;
        };
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!("Stored admin secret hash is invalid: {}", e);
                false
            }
        }
    }
}

/// Hash a secret with Argon2id default parameters and a random salt.
pub fn hash_secret(secret: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(secret.as_bytes(), &salt)?
        .to_string())
}
