//! Options for parsing and serializing envelopes.

/// Configuration for [`parse_with`](crate::parse_with).
///
/// # Examples
///
/// ```rust
/// use jwe_envelope_core::ParseOptions;
///
/// let options = ParseOptions {
///     max_input_len: Some(64 * 1024),
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// The maximum input length in bytes, measured before whitespace is
    /// stripped. `None` accepts any length.
    pub max_input_len: Option<usize>,
}

/// Configuration for [`Envelope::to_compact_with`](crate::Envelope::to_compact_with)
/// and [`Envelope::to_full_json_with`](crate::Envelope::to_full_json_with).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Emit the protected-header bytes as they were parsed, when the envelope
    /// has them, instead of re-serializing the protected header.
    pub reuse_original_protected: bool,
}
