use thiserror::Error;

/// Error type for access-token operations.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// The configured secret derives to fewer bytes than HS256 allows.
    /// Raised at construction so a weak key aborts startup, never a request.
    #[error("Signing key too weak: {actual} bytes, need at least {min}")]
    WeakKey { min: usize, actual: usize },

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    /// Signature, issuer, audience, type-marker, subject or username checks
    /// failed. The token is rejected as a whole.
    #[error("Token is invalid: {0}")]
    Invalid(String),

    /// The token is past its expiry beyond the configured leeway.
    #[error("Token is expired")]
    Expired,
}
