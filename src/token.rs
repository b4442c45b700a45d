//! Signed session-token codec (compact HS256 JWT).
//!
//! Issues and verifies self-contained bearer tokens of the form
//! `base64url(header).base64url(payload).base64url(signature)` with an
//! HMAC-SHA256 signature over the first two segments. Single symmetric key,
//! single issuer/audience; no key rotation or algorithm negotiation.
//!
//! Verification is a total function: every malformed, tampered, or expired
//! input maps to a [`Rejection`] value, never a panic.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::encoding::{b64url_decode, b64url_encode, constant_time_eq};

type HmacSha256 = Hmac<Sha256>;

/// Signature algorithm label embedded in every token header.
const ALG: &str = "HS256";

/// Token type label embedded in every token header.
const TYP: &str = "JWT";

/// Why a token was rejected.
///
/// The Gateway collapses all three cases to "not authenticated" so callers
/// cannot probe which verification stage failed; the distinction exists for
/// logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Structural failure: wrong segment count, invalid base64, or an
    /// unparsable/incomplete payload.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the current secret key.
    #[error("bad token signature")]
    BadSignature,
    /// Signature is valid but `exp` is in the past.
    #[error("expired token")]
    Expired,
}

/// Claims returned to the caller after successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    /// Opaque user identifier (an email address in practice).
    pub subject: String,
    /// Opaque role label; store-and-forward, not validated against an enum.
    pub role: String,
}

/// Wire header, round-trips as `{"alg":"HS256","typ":"JWT"}`.
#[derive(Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Wire payload. Every field is required at decode time; a missing or
/// mistyped field fails closed as [`Rejection::Malformed`].
#[derive(Serialize, Deserialize)]
struct Payload {
    sub: String,
    role: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed session tokens.
///
/// Stateless apart from the immutable key material captured at construction;
/// safe to share across threads.
pub struct TokenCodec {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    ttl_minutes: u64,
}

impl TokenCodec {
    /// Create a codec from explicit parameters.
    pub fn new(secret: &str, issuer: &str, audience: &str, ttl_minutes: u64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl_minutes,
        }
    }

    /// Create a codec from validated configuration.
    pub fn from_config(config: &crate::config::AuthConfig) -> Self {
        Self::new(
            &config.secret,
            &config.issuer,
            &config.audience,
            config.ttl_minutes,
        )
    }

    /// Issue a token for `subject` with `role`, valid from now for the
    /// configured lifetime.
    pub fn issue(&self, subject: &str, role: &str) -> anyhow::Result<String> {
        self.issue_at(subject, role, epoch_secs())
    }

    /// Issue a token with an explicit issuance instant (seconds since epoch).
    pub fn issue_at(&self, subject: &str, role: &str, now_secs: i64) -> anyhow::Result<String> {
        if subject.is_empty() {
            anyhow::bail!("token subject must not be empty");
        }
        if role.is_empty() {
            anyhow::bail!("token role must not be empty");
        }

        let header = Header {
            alg: ALG.to_string(),
            typ: TYP.to_string(),
        };
        let payload = Payload {
            sub: subject.to_string(),
            role: role.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now_secs,
            exp: now_secs + self.ttl_minutes as i64 * 60,
        };

        let header_b64 = b64url_encode(&serde_json::to_vec(&header)?);
        let payload_b64 = b64url_encode(&serde_json::to_vec(&payload)?);

        let signing_input = format!("{header_b64}.{payload_b64}");
        let signature_b64 = b64url_encode(&self.sign(&signing_input));

        Ok(format!("{signing_input}.{signature_b64}"))
    }

    /// Verify a token against the wall clock.
    pub fn verify(&self, token: &str) -> Result<ClaimSet, Rejection> {
        self.verify_at(token, epoch_secs())
    }

    /// Verify a token at an explicit instant (seconds since epoch).
    ///
    /// Checks run in a fixed order: structure, signature, payload, expiry.
    pub fn verify_at(&self, token: &str, now_secs: i64) -> Result<ClaimSet, Rejection> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(Rejection::Malformed);
        }
        let (header_b64, payload_b64, signature_b64) = (parts[0], parts[1], parts[2]);

        // Signature first: nothing after this line runs on unauthenticated
        // bytes except the payload parse, which fails closed.
        let supplied = b64url_decode(signature_b64).ok_or(Rejection::Malformed)?;
        let expected = self.sign(&format!("{header_b64}.{payload_b64}"));
        if !constant_time_eq(&supplied, &expected) {
            return Err(Rejection::BadSignature);
        }

        let payload_bytes = b64url_decode(payload_b64).ok_or(Rejection::Malformed)?;
        let payload: Payload =
            serde_json::from_slice(&payload_bytes).map_err(|_| Rejection::Malformed)?;

        if payload.exp < now_secs {
            return Err(Rejection::Expired);
        }

        Ok(ClaimSet {
            subject: payload.sub,
            role: payload.role,
        })
    }

    /// HMAC-SHA256 over the UTF-8 bytes of the signing input.
    fn sign(&self, signing_input: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can accept any key length");
        mac.update(signing_input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
