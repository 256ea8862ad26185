use crate::types::DbId;

/// Domain-level error taxonomy shared across all crates.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A request precondition was not met. No state is mutated.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation conflicts with current state (e.g. a video already
    /// belongs to a different chain).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required external service is not configured (missing provider
    /// credentials). Fail fast, never retried.
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
