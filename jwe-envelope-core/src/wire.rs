//! Raw JSON shapes of a JWE, as they appear on the wire.
//!
//! Every binary member is carried as base64url text and decoded by the
//! parser, so a bad encoding surfaces as `Error::Base64` rather than a JSON
//! error.

use serde::{Deserialize, Serialize};

use crate::header::Header;

/// The JSON serialization of a JWE, covering both the flattened and the
/// general shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawJwe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unprotected: Option<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<RawRecipient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// One entry of the `recipients` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawRecipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub encrypted_key: String,
}

/// Encodes `data` unless it is empty.
pub(crate) fn non_empty(data: &[u8]) -> Option<String> {
    (!data.is_empty()).then(|| crate::utils::encode(data))
}
