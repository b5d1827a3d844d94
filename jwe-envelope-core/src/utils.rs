use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Error, Result};

/// Encodes bytes as unpadded base64url.
pub(crate) fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes unpadded base64url, rejecting padding and non-alphabet characters.
///
/// # Errors
/// * `Error::Base64` - If `input` is not valid unpadded base64url
pub(crate) fn decode(field: &'static str, input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|source| Error::Base64 { field, source })
}

/// Removes every whitespace character from `input`.
pub(crate) fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}
