//! Compact and JSON serialization of envelopes.
//!
//! The JSON serializer picks the flattened shape by itself whenever the
//! envelope has a single recipient; callers cannot force the general shape
//! for one recipient.

use tracing::debug;

use crate::config::SerializeOptions;
use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::utils::encode;
use crate::wire::{non_empty, RawJwe, RawRecipient};

impl Envelope {
    /// Serializes the envelope in compact form.
    ///
    /// # Errors
    /// * `Error::UnsupportedShape` - If the envelope has more than one
    ///   recipient, a shared unprotected header, or a per-recipient header
    pub fn to_compact(&self) -> Result<String> {
        self.to_compact_with(&SerializeOptions::default())
    }

    /// Serializes the envelope in compact form with explicit options.
    ///
    /// # Errors
    /// * `Error::UnsupportedShape` - As for [`to_compact`](Self::to_compact)
    pub fn to_compact_with(&self, options: &SerializeOptions) -> Result<String> {
        let recipient = match self.recipients() {
            [_, _, ..] => return Err(Error::UnsupportedShape("multiple recipients")),
            [recipient] if recipient.header().is_none() => recipient,
            _ => return Err(Error::UnsupportedShape("per-recipient header")),
        };
        if self.unprotected_header().is_some() {
            return Err(Error::UnsupportedShape("unprotected header"));
        }

        let protected = self.protected_bytes(options.reuse_original_protected);

        Ok(format!(
            "{}.{}.{}.{}.{}",
            encode(protected),
            encode(recipient.encrypted_key()),
            encode(self.iv()),
            encode(self.ciphertext()),
            encode(self.tag()),
        ))
    }

    /// Serializes the envelope in JSON form.
    ///
    /// One recipient produces the flattened shape, several produce a
    /// `recipients` array. Empty binary members and absent headers are
    /// omitted; `aad` is emitted whenever it is present.
    #[must_use]
    pub fn to_full_json(&self) -> String {
        self.to_full_json_with(&SerializeOptions::default())
    }

    /// Serializes the envelope in JSON form with explicit options.
    ///
    /// # Panics
    /// Never in practice; the wire struct holds only strings and headers.
    #[must_use]
    pub fn to_full_json_with(&self, options: &SerializeOptions) -> String {
        let protected = self.protected_bytes(options.reuse_original_protected);

        let mut raw = RawJwe {
            protected: non_empty(&protected),
            unprotected: self.unprotected_header().cloned(),
            aad: self.aad().map(encode),
            iv: non_empty(self.iv()),
            ciphertext: non_empty(self.ciphertext()),
            tag: non_empty(self.tag()),
            ..RawJwe::default()
        };

        match self.recipients() {
            [recipient] => {
                raw.header = recipient.header().cloned();
                raw.encrypted_key = non_empty(recipient.encrypted_key());
            }
            recipients => {
                raw.recipients = recipients
                    .iter()
                    .map(|recipient| RawRecipient {
                        header: recipient.header().cloned(),
                        encrypted_key: encode(recipient.encrypted_key()),
                    })
                    .collect();
            }
        }

        debug!(
            recipients = self.recipients().len(),
            flattened = raw.recipients.is_empty(),
            "serializing JSON envelope"
        );

        serde_json::to_string(&raw).expect("RawJwe holds only strings and JSON objects")
    }
}
