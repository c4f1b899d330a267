//! Error types for the newsgate crate.

/// Service-level error types.
///
/// The similarity and screening functions themselves have no failure
/// paths; errors arise only at the service boundary (wire protocol,
/// stdio transport, configuration).
#[derive(Debug, thiserror::Error)]
pub enum NewsgateError {
    /// JSON-RPC protocol violation (oversized line, malformed framing).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A configuration value failed to parse.
    #[error("invalid value for {name}: {value:?}")]
    Config { name: String, value: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error on the stdio transport.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for newsgate operations.
pub type NewsgateResult<T> = Result<T, NewsgateError>;
