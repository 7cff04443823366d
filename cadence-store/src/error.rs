/// Error taxonomy for the Task Tracking Store
///
/// Every store operation returns `Result<T, StoreError>`. The four variants
/// are deliberately distinct so the presentation layer can surface each as a
/// different user-visible outcome instead of a generic failure:
///
/// - `Validation`: malformed input (empty title, non-positive quota)
/// - `NotFound`: a referenced id does not exist
/// - `Authorization`: the caller is not the owner/author and not an ADMIN
/// - `Storage`: the underlying database failed; never retried by the store
///
/// # Example
///
/// ```
/// use cadence_store::error::StoreError;
///
/// let err = StoreError::validation("title must not be empty");
/// assert!(matches!(err, StoreError::Validation(_)));
/// ```

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Unified store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to act on the resource
    #[error("Not authorized: {0}")]
    Authorization(String),

    /// Storage engine failure (connection loss, constraint violation)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl StoreError {
    /// Shorthand for a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    /// Shorthand for a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        StoreError::NotFound(msg.into())
    }

    /// Shorthand for an authorization error
    pub fn authorization(msg: impl Into<String>) -> Self {
        StoreError::Authorization(msg.into())
    }
}
