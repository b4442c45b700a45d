//! Authentication core for the Rollcall attendance platform.
//!
//! Two independent, stateless codecs plus a thin facade over both:
//! - [`token::TokenCodec`] — issues and verifies compact HS256 session
//!   tokens (opaque bearer strings handed to clients by the gateway).
//! - [`credential::CredentialCodec`] — PBKDF2-HMAC-SHA256 password hashing
//!   with per-record salt and a self-describing stored encoding.
//!
//! The HTTP gateway (cookies, routing, role gating) lives elsewhere; this
//! crate owns only cryptographic correctness, encoding, and failure-mode
//! precision. Every verification path is total: tampered or garbled input
//! becomes a [`token::Rejection`] or a `false`, never a panic.
//!
//! ```no_run
//! use rollcall_auth::{AuthConfig, Authenticator};
//!
//! let config = AuthConfig::from_env()?;
//! let auth = Authenticator::new(&config);
//!
//! let stored = auth.hash_password("Sup3r$ecret");
//! assert!(auth.verify_password("Sup3r$ecret", &stored));
//!
//! let token = auth.issue_token("alice@x.com", "Teacher")?;
//! let claims = auth.verify_token(&token).expect("fresh token verifies");
//! assert_eq!(claims.role, "Teacher");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod credential;
pub mod encoding;
pub mod token;

pub use config::AuthConfig;
pub use credential::{is_strong_password, CredentialCodec};
pub use token::{ClaimSet, Rejection, TokenCodec};

/// Boundary facade handed to the authentication gateway.
///
/// Bundles both codecs constructed from one validated [`AuthConfig`].
/// Stateless and clock-driven; share one instance across request handlers.
pub struct Authenticator {
    tokens: TokenCodec,
    credentials: CredentialCodec,
}

impl Authenticator {
    /// Build the facade from validated configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            tokens: TokenCodec::from_config(config),
            credentials: CredentialCodec::from_config(config),
        }
    }

    /// Issue a bearer token for an authenticated subject.
    pub fn issue_token(&self, subject: &str, role: &str) -> anyhow::Result<String> {
        self.tokens.issue(subject, role)
    }

    /// Verify a presented bearer token.
    ///
    /// The gateway treats every rejection identically ("not authenticated");
    /// the variant is logged here for operators only.
    pub fn verify_token(&self, token: &str) -> Result<ClaimSet, Rejection> {
        match self.tokens.verify(token) {
            Ok(claims) => Ok(claims),
            Err(rejection) => {
                tracing::debug!(%rejection, "token rejected");
                Err(rejection)
            }
        }
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> String {
        self.credentials.hash(password)
    }

    /// Verify a password against its stored encoding.
    pub fn verify_password(&self, password: &str, stored: &str) -> bool {
        self.credentials.verify(password, stored)
    }

    /// Whether a stored credential should be re-hashed at the current cost.
    pub fn password_needs_rehash(&self, stored: &str) -> bool {
        self.credentials.needs_rehash(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret: "facade-test-secret".to_string(),
            issuer: "app".to_string(),
            audience: "app".to_string(),
            ttl_minutes: 60,
            kdf_iterations: 1_000,
            production: false,
        }
    }

    #[test]
    fn login_flow_end_to_end() {
        let auth = Authenticator::new(&test_config());

        // Account creation: hash and store.
        let stored = auth.hash_password("Sup3r$ecret");

        // Login: verify credentials, then issue a session token.
        assert!(auth.verify_password("Sup3r$ecret", &stored));
        assert!(!auth.verify_password("Sup3r$ecreT", &stored));

        let token = auth.issue_token("alice@x.com", "Teacher").unwrap();

        // Subsequent request: recover the claims.
        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.subject, "alice@x.com");
        assert_eq!(claims.role, "Teacher");
    }

    #[test]
    fn facade_rejects_garbage_tokens() {
        let auth = Authenticator::new(&test_config());
        assert_eq!(auth.verify_token("nonsense"), Err(Rejection::Malformed));
    }

    #[test]
    fn facade_reports_rehash_need() {
        let auth = Authenticator::new(&test_config());
        let stored = auth.hash_password("Sup3r$ecret");
        assert!(!auth.password_needs_rehash(&stored));

        let mut weaker = test_config();
        weaker.kdf_iterations = 500;
        let legacy = Authenticator::new(&weaker).hash_password("Sup3r$ecret");
        assert!(auth.password_needs_rehash(&legacy));
    }
}
