//! Server lifecycle hooks the use cases may pull.

/// Requests a supervised shutdown of the whole server.
pub trait ShutdownTrigger: Send + Sync {
    fn trigger(&self);

    fn is_triggered(&self) -> bool;
}
