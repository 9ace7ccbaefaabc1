use thiserror::Error;

/// Failure of a single remote call. Callers get exactly one outcome per
/// call; retrying is their responsibility.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, body decode).
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    /// The service answered with an error payload.
    #[error("{message}")]
    Service { status: u16, message: String },
}

impl ApiError {
    /// The single message surfaced on a store's `error` field.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
