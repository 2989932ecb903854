//! # Error Handling
//!
//! This module provides error handling for the tradeprobe harness.
//! It defines custom error types using `thiserror` for the probe pipeline.

/// Custom result type for tradeprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the tradeprobe harness
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors (missing mandatory secret, invalid base URL)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network transport errors outside the per-case reporting path
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body that was required to be JSON was not.
    /// Carries the raw body prefix so the operator can see what came back.
    #[error("Invalid response from {context}: not valid JSON: {body_prefix}")]
    InvalidResponse { context: String, body_prefix: String },

    /// Serialization errors when building request bodies
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maximum number of raw-body characters surfaced in an `InvalidResponse`.
pub const BODY_PREFIX_LEN: usize = 200;

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create an invalid-response error, truncating the raw body to its prefix
    pub fn invalid_response<S: Into<String>>(context: S, raw_body: &str) -> Self {
        let body_prefix = raw_body.chars().take(BODY_PREFIX_LEN).collect();
        Self::InvalidResponse { context: context.into(), body_prefix }
    }

    /// Create a serialization error with context
    pub fn serialization<S: Into<String>>(source: serde_json::Error, context: S) -> Self {
        Self::Serialization { source, context: context.into() }
    }
}
