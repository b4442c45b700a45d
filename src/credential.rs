//! Credential store codec: password hashing and verification.
//!
//! Derives a non-reversible encoding of a password with PBKDF2-HMAC-SHA256
//! over a fresh random salt, stored as `<iterations>.<salt>.<hash>` with
//! standard base64 fields. The iteration count travels with the record so the
//! work factor can be raised without invalidating existing credentials;
//! [`CredentialCodec::needs_rehash`] tells the caller when a record was
//! produced at a lower cost and should be re-hashed on next login.

use rand::RngCore;
use sha2::Sha256;

use crate::encoding::{b64_decode, b64_encode, constant_time_eq};

/// Salt length in bytes (fresh random salt per credential).
const SALT_LEN: usize = 16;

/// Derived key length in bytes.
const HASH_LEN: usize = 32;

/// Hashes and verifies user passwords.
///
/// Stateless apart from the configured iteration count; safe to share across
/// threads. Verification always re-derives at the cost recorded *in* the
/// stored encoding, not the configured one.
pub struct CredentialCodec {
    iterations: u32,
}

impl CredentialCodec {
    /// Create a codec with an explicit PBKDF2 iteration count.
    pub fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Create a codec from validated configuration.
    pub fn from_config(config: &crate::config::AuthConfig) -> Self {
        Self::new(config.kdf_iterations)
    }

    /// Hash a password into a self-describing stored encoding.
    ///
    /// Empty passwords are permitted; whether to require more is the
    /// Gateway's policy call (see [`is_strong_password`]).
    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::rngs::OsRng.fill_bytes(&mut salt);

        let derived = derive_key(password, &salt, self.iterations);

        format!(
            "{}.{}.{}",
            self.iterations,
            b64_encode(&salt),
            b64_encode(&derived)
        )
    }

    /// Verify a password against a stored encoding.
    ///
    /// Total function: a truncated, garbled, or non-numeric encoding yields
    /// `false`, never a panic, and is indistinguishable from a wrong
    /// password at the caller's boundary.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        let Some((iterations, salt, hash)) = parse_encoding(stored) else {
            return false;
        };

        let derived = derive_key(password, &salt, iterations);
        constant_time_eq(&derived, &hash)
    }

    /// Whether a stored encoding should be re-hashed at the current cost.
    ///
    /// True for unparsable records and for records derived with fewer
    /// iterations than currently configured. The Gateway calls this after a
    /// successful login and re-hashes with the password it already holds.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        match parse_encoding(stored) {
            Some((iterations, _, _)) => iterations < self.iterations,
            None => true,
        }
    }
}

/// PBKDF2-HMAC-SHA256 key derivation.
fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Parse `<iterations>.<salt>.<hash>` into its decoded parts.
///
/// Returns `None` unless there are exactly three fields, the iteration count
/// is a positive decimal integer, and both byte fields decode.
fn parse_encoding(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut fields = stored.split('.');
    let (iterations, salt, hash) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let iterations: u32 = iterations.parse().ok()?;
    if iterations == 0 {
        return None;
    }

    Some((iterations, b64_decode(salt)?, b64_decode(hash)?))
}

/// Password strength policy: at least 8 characters with an uppercase letter,
/// a lowercase letter, a digit, and a non-alphanumeric character.
///
/// Advisory helper for the Gateway's registration and password-change flows;
/// [`CredentialCodec::hash`] does not enforce it.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}
