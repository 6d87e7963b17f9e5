//! Error types for chaptermill.
//!
//! This module defines the error taxonomy for chapter retrieval and
//! extraction. Structural absences (missing title, missing content
//! candidates) are not errors; they degrade to empty values. Errors are
//! reserved for transport failures and terminal conditions.

/// Error type for retrieval and pagination operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client construction failed.
    #[error("HTTP client construction failed: {0}")]
    Client(String),

    /// Network-level failure on a required request.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// URL of the failed request.
        url: String,
        /// Underlying transport failure description.
        reason: String,
    },

    /// The server answered with an error status.
    #[error("{url} returned HTTP status {status}")]
    Status {
        /// URL of the failed request.
        url: String,
        /// HTTP status code (>= 400).
        status: u16,
    },

    /// Every chapter list strategy came up empty.
    #[error("no chapters found at {url} after all resolution strategies")]
    NoChapters {
        /// Landing page that yielded no chapters.
        url: String,
    },

    /// `paginate` was called with a group size below 1.
    #[error("invalid group size {0}: must be at least 1")]
    InvalidGroupSize(usize),
}

/// Result type alias for retrieval and pagination operations.
pub type Result<T> = std::result::Result<T, Error>;
