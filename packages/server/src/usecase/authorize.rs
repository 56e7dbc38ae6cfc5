//! Admin secret check off the async worker threads.

use std::sync::Arc;

use crate::domain::SecretVerifier;

/// Argon2 is deliberately slow, so verification runs on the blocking pool.
pub(super) async fn authorize(verifier: &Arc<dyn SecretVerifier>, candidate: &str) -> bool {
    let verifier = verifier.clone();
    let candidate = candidate.to_string();
    match tokio::task::spawn_blocking(move || verifier.verify(&candidate)).await {
        Ok(granted) => granted,
        Err(e) => {
            tracing::error!("Admin secret verification task failed: {}", e);
            false
        }
    }
}
