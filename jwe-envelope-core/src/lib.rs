//! JWE envelope parsing and serialization.
//!
//! This crate models the outer structure of a JSON Web Encryption (RFC 7516)
//! message and moves it between its wire representations. It does not
//! encrypt or decrypt anything; it establishes the byte-exact envelope that
//! a crypto layer authenticates and consumes.
//!
//! # Features
//!
//! - Parsing of the compact form and of the JSON form (flattened and general),
//!   with the wire shape sniffed from the first non-whitespace character
//! - Serialization back to compact or JSON form, choosing the flattened shape
//!   automatically for a single recipient
//! - Per-recipient header merging (protected, then unprotected, then recipient)
//! - Reconstruction of the additional authenticated data from the protected
//!   header bytes exactly as they were received
//!
//! # Architecture
//!
//! The crate is organized into these main modules:
//! - `header`: Ordered header mapping and the merge fold
//! - `envelope`: The in-memory envelope, recipients and the builder
//! - `parse`: Compact and JSON parsers
//! - `serialize`: Compact and JSON serializers
//! - `config`: Parse and serialize options
//! - `error`: Error types and handling
//!
//! # Examples
//!
//! ```rust
//! use jwe_envelope_core::{parse, Shape};
//!
//! # fn main() -> jwe_envelope_core::Result<()> {
//! let envelope = parse("eyJhbGciOiJkaXIiLCJlbmMiOiJBMTI4R0NNIn0..YWJj.ZGVm.Z2hp")?;
//!
//! assert_eq!(envelope.shape(), Shape::Compact);
//! assert!(envelope.recipients()[0].encrypted_key().is_empty());
//! assert_eq!(envelope.merged_header_at(0).unwrap().alg(), Some("dir"));
//!
//! // The authenticated data reuses the received protected-header bytes.
//! assert_eq!(
//!     envelope.compute_aad(),
//!     b"eyJhbGciOiJkaXIiLCJlbmMiOiJBMTI4R0NNIn0".to_vec()
//! );
//!
//! // A single recipient without its own header serializes flattened.
//! let json = envelope.to_full_json();
//! assert!(!json.contains("recipients"));
//! # Ok(())
//! # }
//! ```
//!
//! # Authenticated data and hand-built envelopes
//!
//! An envelope obtained from [`parse`] keeps the protected-header bytes it was
//! given, and [`Envelope::compute_aad`] uses them verbatim. An envelope built
//! with [`EnvelopeBuilder`] has no such bytes, so its AAD comes from the
//! canonical serialization of the protected header (compact JSON in insertion
//! order). Other implementations may canonicalize differently; keep the
//! received bytes whenever authenticity matters.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod header;
pub mod parse;
pub mod prelude;
pub mod serialize;

mod utils;
mod wire;

#[cfg(test)]
mod proptests;

pub use config::{ParseOptions, SerializeOptions};
pub use envelope::{Envelope, EnvelopeBuilder, Recipient, Shape};
pub use error::{Error, Result};
pub use header::{merge_headers, Header, ALG, ENC};
pub use parse::{parse, parse_with};
