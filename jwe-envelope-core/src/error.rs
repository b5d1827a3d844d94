//! Error types for the jwe-envelope-core crate.

use thiserror::Error;

/// Error type for envelope parsing and serialization
#[derive(Debug, Error)]
pub enum Error {
    /// A base64url field could not be decoded
    #[error("Base64 decode error in {field}: {source}")]
    Base64 {
        /// The wire field that failed to decode
        field: &'static str,
        /// The underlying decode error
        #[source]
        source: base64::DecodeError,
    },
    /// The JSON text of the envelope is malformed
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The protected header bytes are not an encoded JSON object
    #[error("Malformed header: {0}")]
    MalformedHeader(String),
    /// A compact envelope did not have exactly five segments
    #[error("Malformed compact envelope: expected 5 parts, got {parts}")]
    MalformedCompact {
        /// Number of dot-separated segments found
        parts: usize,
    },
    /// A recipient entry in the `recipients` array is malformed
    #[error("Malformed recipient {index}: {source}")]
    MalformedRecipient {
        /// Position of the recipient in the array
        index: usize,
        /// The underlying decode error
        #[source]
        source: base64::DecodeError,
    },
    /// The merged header for a recipient lacks `alg` or `enc`
    #[error("Message is missing alg/enc headers for recipient {recipient}")]
    MissingAlgEnc {
        /// Position of the offending recipient
        recipient: usize,
    },
    /// The envelope cannot be represented in the requested form
    #[error("Unsupported shape: {0}")]
    UnsupportedShape(&'static str),
    /// An envelope must have at least one recipient
    #[error("Envelope has no recipients")]
    NoRecipients,
    /// The input exceeds the configured size limit
    #[error("Input too large: {len} bytes exceeds maximum {max}")]
    InputTooLarge {
        /// Length of the input
        len: usize,
        /// Configured maximum
        max: usize,
    },
}

/// Result type for the jwe-envelope-core crate
pub type Result<T> = std::result::Result<T, Error>;
