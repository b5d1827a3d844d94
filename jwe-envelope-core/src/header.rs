//! JWE header mapping and header merging.
//!
//! A [`Header`] is an insertion-ordered JSON object. The envelope carries up to
//! three of them (protected, shared unprotected, per-recipient) and the
//! effective header for a recipient is the overlay of all three.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// The algorithm header parameter.
pub const ALG: &str = "alg";

/// The content encryption header parameter.
pub const ENC: &str = "enc";

/// An ordered mapping of JWE header parameters.
///
/// # Examples
///
/// ```rust
/// use jwe_envelope_core::Header;
///
/// let header = Header::new().with("alg", "dir").with("enc", "A256GCM");
/// assert_eq!(header.alg(), Some("dir"));
/// assert_eq!(header.to_vec(), br#"{"alg":"dir","enc":"A256GCM"}"#.to_vec());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Creates an empty header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter and returns the header, for chained construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Gets a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the header has the given parameter.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates the parameters in insertion order.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the header has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `alg` parameter, if it is a string.
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.get_str(ALG)
    }

    /// The `enc` parameter, if it is a string.
    #[must_use]
    pub fn enc(&self) -> Option<&str> {
        self.get_str(ENC)
    }

    /// Whether both `alg` and `enc` are present and non-empty.
    #[must_use]
    pub fn has_alg_enc(&self) -> bool {
        matches!((self.alg(), self.enc()), (Some(alg), Some(enc)) if !alg.is_empty() && !enc.is_empty())
    }

    /// Overlays `other` onto this header; its values win on collision.
    pub fn merge(&mut self, other: &Header) {
        for (key, value) in other {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Canonical serialization: compact JSON in insertion order.
    ///
    /// # Panics
    /// Never in practice; a string-keyed map of JSON values always serializes.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        serde_json::to_vec(&self.0).expect("string-keyed JSON map serialization failed")
    }

    /// Decodes header bytes.
    ///
    /// # Errors
    /// * `Error::MalformedHeader` - If `bytes` is not a JSON object
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::MalformedHeader(e.to_string()))
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Header {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Header> for Value {
    fn from(header: Header) -> Self {
        Value::Object(header.0)
    }
}

/// Builds the effective header for one recipient.
///
/// Present headers are applied in order protected, unprotected, recipient; a
/// later header's value replaces an earlier one for the same key. None of the
/// inputs is modified.
#[must_use]
pub fn merge_headers(
    protected: &Header,
    unprotected: Option<&Header>,
    recipient: Option<&Header>,
) -> Header {
    [Some(protected), unprotected, recipient]
        .into_iter()
        .flatten()
        .fold(Header::new(), |mut merged, header| {
            merged.merge(header);
            merged
        })
}
