//! The in-memory JWE envelope.
//!
//! An [`Envelope`] is produced either by [`parse`](crate::parse), in which case
//! it keeps the protected-header bytes it received, or by [`EnvelopeBuilder`],
//! in which case the protected header is serialized canonically on demand.
//! Envelopes are immutable once built.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{Error, Result};
use crate::header::{merge_headers, Header};
use crate::utils::encode;

/// The wire shape of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Five dot-separated base64url segments
    Compact,
    /// JSON form with the sole recipient hoisted to the top level
    Flattened,
    /// JSON form with a `recipients` array
    General,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compact => write!(f, "compact"),
            Self::Flattened => write!(f, "flattened"),
            Self::General => write!(f, "general"),
        }
    }
}

/// One recipient of an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipient {
    pub(crate) header: Option<Header>,
    pub(crate) encrypted_key: Vec<u8>,
}

impl Recipient {
    /// Creates a recipient with the given wrapped content encryption key.
    ///
    /// The key may be empty, as it is for direct key agreement.
    #[must_use]
    pub fn new(encrypted_key: impl Into<Vec<u8>>) -> Self {
        Self {
            header: None,
            encrypted_key: encrypted_key.into(),
        }
    }

    /// Sets the per-recipient header.
    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    /// The per-recipient header, if any.
    #[must_use]
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The wrapped content encryption key.
    #[must_use]
    pub fn encrypted_key(&self) -> &[u8] {
        &self.encrypted_key
    }
}

/// A parsed or hand-built JWE envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    protected: Header,
    unprotected: Option<Header>,
    recipients: Vec<Recipient>,
    aad: Option<Vec<u8>>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
    /// Protected header bytes as received; `None` for built envelopes.
    original_protected: Option<Vec<u8>>,
    parsed_shape: Option<Shape>,
}

/// The decoded pieces of an envelope, before validation.
pub(crate) struct Parts {
    pub protected: Header,
    pub unprotected: Option<Header>,
    pub recipients: Vec<Recipient>,
    pub aad: Option<Vec<u8>>,
    pub iv: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

impl Envelope {
    /// Starts building an envelope by hand.
    #[must_use]
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::new()
    }

    /// Validates `parts` and assembles an envelope.
    pub(crate) fn from_parts(
        parts: Parts,
        original_protected: Option<Vec<u8>>,
        parsed_shape: Option<Shape>,
    ) -> Result<Self> {
        let envelope = Self {
            protected: parts.protected,
            unprotected: parts.unprotected,
            recipients: parts.recipients,
            aad: parts.aad,
            iv: parts.iv,
            ciphertext: parts.ciphertext,
            tag: parts.tag,
            original_protected,
            parsed_shape,
        };
        envelope.validate()?;
        Ok(envelope)
    }

    fn validate(&self) -> Result<()> {
        if self.recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        for (index, recipient) in self.recipients.iter().enumerate() {
            if !self.merged_header(Some(recipient)).has_alg_enc() {
                return Err(Error::MissingAlgEnc { recipient: index });
            }
        }

        Ok(())
    }

    /// The integrity-protected header.
    #[must_use]
    pub fn protected_header(&self) -> &Header {
        &self.protected
    }

    /// The shared unprotected header, if any.
    #[must_use]
    pub fn unprotected_header(&self) -> Option<&Header> {
        self.unprotected.as_ref()
    }

    /// The recipients, never empty.
    #[must_use]
    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// The caller-supplied additional authenticated data, if any.
    #[must_use]
    pub fn aad(&self) -> Option<&[u8]> {
        self.aad.as_deref()
    }

    /// An owned copy of the additional authenticated data, if any.
    #[must_use]
    pub fn auth_data(&self) -> Option<Vec<u8>> {
        self.aad.clone()
    }

    /// The initialization vector.
    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// The ciphertext.
    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// The authentication tag.
    #[must_use]
    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// The protected-header bytes as received, for parsed envelopes.
    #[must_use]
    pub fn original_protected(&self) -> Option<&[u8]> {
        self.original_protected.as_deref()
    }

    /// The shape this envelope was parsed from, or for a built envelope the
    /// JSON shape [`to_full_json`](Self::to_full_json) would produce.
    #[must_use]
    pub fn shape(&self) -> Shape {
        self.parsed_shape.unwrap_or(if self.recipients.len() > 1 {
            Shape::General
        } else {
            Shape::Flattened
        })
    }

    /// Whether the envelope fits the compact form: one recipient, no shared
    /// unprotected header and no per-recipient header.
    #[must_use]
    pub fn is_compact_eligible(&self) -> bool {
        self.unprotected.is_none()
            && matches!(self.recipients.as_slice(), [only] if only.header.is_none())
    }

    /// The effective header for `recipient`: protected, then unprotected,
    /// then the recipient's own header. With `None` only the shared headers
    /// are merged.
    #[must_use]
    pub fn merged_header(&self, recipient: Option<&Recipient>) -> Header {
        merge_headers(
            &self.protected,
            self.unprotected.as_ref(),
            recipient.and_then(Recipient::header),
        )
    }

    /// The effective header for the recipient at `index`.
    #[must_use]
    pub fn merged_header_at(&self, index: usize) -> Option<Header> {
        self.recipients
            .get(index)
            .map(|recipient| self.merged_header(Some(recipient)))
    }

    /// The bytes of the protected header used on the wire and for the AAD.
    ///
    /// Received bytes win over re-serialization when `reuse_original` is set.
    /// An empty protected header has no bytes, so it stays absent on the wire.
    pub(crate) fn protected_bytes(&self, reuse_original: bool) -> Cow<'_, [u8]> {
        match &self.original_protected {
            Some(original) if reuse_original => Cow::Borrowed(original),
            _ if self.protected.is_empty() => Cow::Borrowed(&[]),
            _ => Cow::Owned(self.protected.to_vec()),
        }
    }

    /// Reconstructs the additional authenticated data for content encryption.
    ///
    /// The result is the base64url text of the protected header, followed by
    /// `.` and the base64url text of [`aad`](Self::aad) when that is present.
    /// Parsed envelopes use the protected-header bytes exactly as received.
    #[must_use]
    pub fn compute_aad(&self) -> Vec<u8> {
        let mut output = encode(self.protected_bytes(true)).into_bytes();

        if let Some(aad) = &self.aad {
            output.push(b'.');
            output.extend_from_slice(encode(aad).as_bytes());
        }

        output
    }
}

/// Builder for envelopes assembled from their components.
///
/// Built envelopes carry no original protected-header bytes, so their AAD
/// comes from the canonical serialization of the protected header.
///
/// # Examples
///
/// ```rust
/// use jwe_envelope_core::{Envelope, Header, Recipient};
///
/// # fn main() -> jwe_envelope_core::Result<()> {
/// let envelope = Envelope::builder()
///     .protected(Header::new().with("enc", "A128CBC-HS256"))
///     .recipient(Recipient::new(vec![1, 2, 3]).with_header(Header::new().with("alg", "A128KW")))
///     .recipient(Recipient::new(vec![4, 5, 6]).with_header(Header::new().with("alg", "RSA1_5")))
///     .iv(vec![0; 16])
///     .ciphertext(b"sealed".to_vec())
///     .tag(vec![0; 16])
///     .build()?;
///
/// assert!(!envelope.is_compact_eligible());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct EnvelopeBuilder {
    protected: Header,
    unprotected: Option<Header>,
    recipients: Vec<Recipient>,
    aad: Option<Vec<u8>>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
}

impl EnvelopeBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the protected header.
    #[must_use]
    pub fn protected(mut self, header: Header) -> Self {
        self.protected = header;
        self
    }

    /// Sets the shared unprotected header.
    #[must_use]
    pub fn unprotected(mut self, header: Header) -> Self {
        self.unprotected = Some(header);
        self
    }

    /// Adds a recipient.
    #[must_use]
    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipients.push(recipient);
        self
    }

    /// Adds several recipients.
    #[must_use]
    pub fn recipients(mut self, recipients: impl IntoIterator<Item = Recipient>) -> Self {
        self.recipients.extend(recipients);
        self
    }

    /// Sets the additional authenticated data.
    #[must_use]
    pub fn aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = Some(aad.into());
        self
    }

    /// Sets the initialization vector.
    #[must_use]
    pub fn iv(mut self, iv: impl Into<Vec<u8>>) -> Self {
        self.iv = iv.into();
        self
    }

    /// Sets the ciphertext.
    #[must_use]
    pub fn ciphertext(mut self, ciphertext: impl Into<Vec<u8>>) -> Self {
        self.ciphertext = ciphertext.into();
        self
    }

    /// Sets the authentication tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<Vec<u8>>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Builds the envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No recipients were added (`Error::NoRecipients`)
    /// - A recipient's merged header lacks `alg` or `enc` (`Error::MissingAlgEnc`)
    pub fn build(self) -> Result<Envelope> {
        debug!(recipients = self.recipients.len(), "building envelope");

        Envelope::from_parts(
            Parts {
                protected: self.protected,
                unprotected: self.unprotected,
                recipients: self.recipients,
                aad: self.aad,
                iv: self.iv,
                ciphertext: self.ciphertext,
                tag: self.tag,
            },
            None,
            None,
        )
    }
}
