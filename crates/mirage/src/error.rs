//! Error taxonomy shared by registration, dispatch, and the store.

/// Errors surfaced by mock registration, dispatch, and the backing store.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    /// Malformed pattern, unknown method, out-of-range status, or an override
    /// naming parameters the target pattern does not have.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A binding (or tree node) with the same uniqueness key already exists.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Backend failure. Fatal to the in-flight operation.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl MockError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Conflict(_) => "conflict",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}
