//! Error types
//!
//! Sanitizing itself never fails. Errors only come from the edges of the
//! crate: decoding markup bytes, loading policy configuration, and the
//! optional depth guard in [`Sanitizer::try_sanitize`](crate::Sanitizer::try_sanitize).

/// Errors raised by parsing, configuration and depth limiting
#[derive(Debug, thiserror::Error)]
pub enum SanitizeError {
    /// Input data cannot be processed at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Character encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Schema or override configuration is malformed
    #[error("Invalid schema configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Tree is deeper than the configured limit
    #[error("Tree depth {depth} exceeds maximum allowed depth {max}")]
    DepthExceeded { depth: usize, max: usize },
}
