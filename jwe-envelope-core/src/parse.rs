//! Parsing of compact and JSON envelopes.
//!
//! Whitespace is insignificant in both wire forms and is removed before the
//! shape is sniffed: input starting with `{` is JSON, anything else is
//! compact. Either a fully validated [`Envelope`] is returned or an error.

use std::str::FromStr;

use tracing::{debug, trace, warn};

use crate::config::ParseOptions;
use crate::envelope::{Envelope, Parts, Recipient, Shape};
use crate::error::{Error, Result};
use crate::header::Header;
use crate::utils::{decode, strip_whitespace};
use crate::wire::RawJwe;

/// Parses an envelope in compact or JSON form.
///
/// # Errors
///
/// Returns an error if:
/// - The JSON text is malformed (`Error::Json`)
/// - A base64url field cannot be decoded (`Error::Base64`, `Error::MalformedRecipient`)
/// - The protected header is not an encoded JSON object (`Error::MalformedHeader`)
/// - A compact input does not have five segments (`Error::MalformedCompact`)
/// - Some recipient's merged header lacks `alg` or `enc` (`Error::MissingAlgEnc`)
pub fn parse(input: &str) -> Result<Envelope> {
    parse_with(input, &ParseOptions::default())
}

/// Parses an envelope with explicit options.
///
/// # Errors
///
/// Fails as [`parse`] does, and with `Error::InputTooLarge` when the input
/// exceeds `options.max_input_len`.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Envelope> {
    if let Some(max) = options.max_input_len {
        if input.len() > max {
            return Err(Error::InputTooLarge {
                len: input.len(),
                max,
            });
        }
    }

    let input = strip_whitespace(input);
    if input.starts_with('{') {
        parse_full(&input)
    } else {
        parse_compact(&input)
    }
}

/// Parses a message in JSON form, flattened or general.
fn parse_full(input: &str) -> Result<Envelope> {
    let raw: RawJwe = serde_json::from_str(input)?;

    let original = match &raw.protected {
        Some(protected) => decode("protected", protected)?,
        None => Vec::new(),
    };
    let protected = if original.is_empty() {
        Header::new()
    } else {
        Header::from_slice(&original)?
    };

    let (shape, recipients) = if raw.recipients.is_empty() {
        let encrypted_key = decode_optional("encrypted_key", raw.encrypted_key.as_deref())?;
        let recipient = Recipient {
            header: raw.header,
            encrypted_key,
        };
        (Shape::Flattened, vec![recipient])
    } else {
        if raw.header.is_some() || raw.encrypted_key.is_some() {
            warn!("ignoring top-level header/encrypted_key alongside recipients");
        }

        let recipients = raw
            .recipients
            .into_iter()
            .enumerate()
            .map(|(index, recipient)| {
                decode("encrypted_key", &recipient.encrypted_key)
                    .map(|encrypted_key| Recipient {
                        header: recipient.header,
                        encrypted_key,
                    })
                    .map_err(|e| match e {
                        Error::Base64 { source, .. } => Error::MalformedRecipient { index, source },
                        other => other,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        (Shape::General, recipients)
    };

    let parts = Parts {
        protected,
        unprotected: raw.unprotected,
        recipients,
        aad: raw.aad.as_deref().map(|aad| decode("aad", aad)).transpose()?,
        iv: decode_optional("iv", raw.iv.as_deref())?,
        ciphertext: decode_optional("ciphertext", raw.ciphertext.as_deref())?,
        tag: decode_optional("tag", raw.tag.as_deref())?,
    };

    debug!(
        %shape,
        recipients = parts.recipients.len(),
        aad = parts.aad.is_some(),
        "parsed JSON envelope"
    );

    Envelope::from_parts(parts, Some(original), Some(shape))
}

/// Parses a message in compact form.
fn parse_compact(input: &str) -> Result<Envelope> {
    let segments: Vec<&str> = input.split('.').collect();
    trace!(parts = segments.len(), "splitting compact envelope");

    let [protected, encrypted_key, iv, ciphertext, tag] = segments.as_slice() else {
        return Err(Error::MalformedCompact {
            parts: segments.len(),
        });
    };

    let original = decode("protected", protected)?;
    let encrypted_key = decode("encrypted_key", encrypted_key)?;
    let iv = decode("iv", iv)?;
    let ciphertext = decode("ciphertext", ciphertext)?;
    let tag = decode("tag", tag)?;

    let protected = Header::from_slice(&original)?;

    // The protected header is the only header source in compact form.
    if !protected.has_alg_enc() {
        return Err(Error::MissingAlgEnc { recipient: 0 });
    }

    debug!(
        protected_len = original.len(),
        ciphertext_len = ciphertext.len(),
        "parsed compact envelope"
    );

    Envelope::from_parts(
        Parts {
            protected,
            unprotected: None,
            recipients: vec![Recipient::new(encrypted_key)],
            aad: None,
            iv,
            ciphertext,
            tag,
        },
        Some(original),
        Some(Shape::Compact),
    )
}

fn decode_optional(field: &'static str, input: Option<&str>) -> Result<Vec<u8>> {
    input.map_or_else(|| Ok(Vec::new()), |input| decode(field, input))
}

impl FromStr for Envelope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}
