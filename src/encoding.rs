//! Shared byte-level helpers for both codecs.
//!
//! Token segments use URL-safe base64 without padding (`+`→`-`, `/`→`_`,
//! trailing `=` stripped). Credential salt/hash fields use standard padded
//! base64. Both codecs compare secret-derived bytes with
//! [`constant_time_eq`] rather than `==`.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Encode bytes as unpadded URL-safe base64 (token segment encoding).
pub fn b64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode an unpadded URL-safe base64 token segment.
///
/// Returns `None` on any invalid input, including padded or non-URL-safe
/// alphabets; callers turn that into a rejection value.
pub fn b64url_decode(input: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(input).ok()
}

/// Encode bytes as standard padded base64 (credential field encoding).
pub fn b64_encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decode a standard padded base64 credential field.
pub fn b64_decode(input: &str) -> Option<Vec<u8>> {
    STANDARD.decode(input).ok()
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// Never short-circuits on the first mismatched byte; the running time
/// depends only on the input length.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b64url_roundtrip() {
        let data = b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}";
        let encoded = b64url_encode(data);
        assert_eq!(b64url_decode(&encoded).unwrap(), data);
    }

    #[test]
    fn b64url_emits_no_padding_or_unsafe_chars() {
        // Lengths 1..=4 cover every padding case of the underlying alphabet.
        for len in 1..=4 {
            let bytes = vec![0xfbu8; len];
            let encoded = b64url_encode(&bytes);
            assert!(!encoded.contains('='), "padding leaked: {encoded}");
            assert!(!encoded.contains('+'));
            assert!(!encoded.contains('/'));
        }
    }

    #[test]
    fn b64url_rejects_padded_and_garbled_input() {
        assert!(b64url_decode("AQID=").is_none());
        assert!(b64url_decode("not base64!!").is_none());
        assert!(b64url_decode("AQ+D").is_none());
    }

    #[test]
    fn b64_standard_roundtrip_with_padding() {
        let salt = [7u8; 16];
        let encoded = b64_encode(&salt);
        assert!(encoded.ends_with("=="));
        assert_eq!(b64_decode(&encoded).unwrap(), salt);
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"short", b"longer"));
        assert!(constant_time_eq(b"", b""));
    }
}
