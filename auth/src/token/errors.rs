use thiserror::Error;

/// Error type for token operations.
///
/// Parse failures keep their distinct kinds; callers decide whether to collapse them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token uses an unsupported format or algorithm: {0}")]
    Unsupported(String),

    #[error("Token signature is invalid")]
    SignatureInvalid,

    #[error("Token is expired")]
    Expired,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Refresh lifetime ({refresh_secs}s) must exceed access lifetime ({access_secs}s)")]
    InvalidLifetimes { access_secs: i64, refresh_secs: i64 },
}
