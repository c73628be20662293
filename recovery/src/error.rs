//! Error type for terminal recovery failure.

use thiserror::Error;

/// All four recovery strategies failed.
///
/// Carries the raw and sanitized input lengths plus the parser message from
/// the most-recovered attempt (sanitize + repair) so an operator can judge
/// how far recovery got. Recovery never substitutes an empty or default
/// document for a failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "all recovery strategies failed (raw {raw_len} bytes, sanitized {sanitized_len} bytes): {parse_error}"
)]
pub struct RecoveryError {
    /// Length of the raw input in bytes.
    pub raw_len: usize,
    /// Length of the sanitized input in bytes.
    pub sanitized_len: usize,
    /// Terminal parser message from the final strategy.
    pub parse_error: String,
}

/// Convenience alias for results with [`RecoveryError`].
pub type Result<T> = std::result::Result<T, RecoveryError>;
