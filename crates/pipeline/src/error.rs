use storyreel_core::error::CoreError;
use storyreel_provider::ProviderError;

/// Error type for pipeline operations, composing the lower layers.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A domain-level error (validation, not-found, conflict).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The provider adapter failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience alias for pipeline return values.
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Shorthand for a not-found error.
    pub fn not_found(entity: &'static str, id: storyreel_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }
}
