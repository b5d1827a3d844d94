//! Prelude module for commonly used types and functions.
//!
//! Import everything from this module with `use jwe_envelope_core::prelude::*`.
//!
//! # Example
//!
//! ```rust
//! use jwe_envelope_core::prelude::*;
//!
//! fn effective_alg(input: &str) -> Result<Option<String>> {
//!     let envelope = parse(input)?;
//!     Ok(envelope
//!         .merged_header_at(0)
//!         .and_then(|header| header.alg().map(str::to_owned)))
//! }
//! ```

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export envelope types
pub use crate::envelope::{Envelope, EnvelopeBuilder, Recipient, Shape};
pub use crate::header::{merge_headers, Header};

// Re-export options
pub use crate::config::{ParseOptions, SerializeOptions};

// Re-export core functions
pub use crate::parse::{parse, parse_with};
