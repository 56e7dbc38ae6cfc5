//! Administrative secret verification.

/// Checks a candidate secret against a stored credential.
///
/// Implementations must compare in constant time and must reject every
/// candidate when no credential is configured.
pub trait SecretVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}
