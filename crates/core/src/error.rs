//! Error types for the Colloquy domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The remote boundary
//! has its own error type ([`ClientError`]); everything the core raises
//! itself lives in [`Error`].

use thiserror::Error;

use crate::message::Role;

/// The top-level error type for conversation operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An entry was appended with a role that does not match its position.
    /// This is a programming-contract violation, never expected in normal
    /// operation.
    #[error("invalid entry: expected role '{expected}', got '{actual}'")]
    InvalidEntry { expected: Role, actual: Role },

    /// The caller attempted to build a request with empty user text.
    /// Recoverable: the loop re-prompts without calling the remote service.
    #[error("user input is empty")]
    EmptyInput,

    /// The remote completion service failed. Recoverable at the turn level:
    /// the store is left unmodified and the loop continues.
    #[error("completion failed: {0}")]
    Completion(#[from] ClientError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the remote completion-client boundary.
///
/// The core treats all of these uniformly as [`Error::Completion`]; the
/// variants exist so the client can log meaningfully.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("rate limited by service, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The response body could not be parsed, or contained no candidates.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
