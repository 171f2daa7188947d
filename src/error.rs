use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Rate limiting and server-side faults are worth retrying later; the rest are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Decode(_) | FetchError::InvalidRequest(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("failed to encode or decode stored collection: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid holding: {0}")]
    InvalidHolding(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failures of screen-level operations that touch both network and storage.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_retryability() {
        let limited = FetchError::Status { status: 429, body: String::new() };
        let missing = FetchError::Status { status: 400, body: String::new() };
        let down = FetchError::Status { status: 503, body: String::new() };
        assert!(limited.is_transient());
        assert!(!missing.is_transient());
        assert!(down.is_transient());
        assert!(!FetchError::InvalidRequest("x".into()).is_transient());
    }
}
