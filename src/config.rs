//! Process-wide authentication configuration.
//!
//! Loaded once at startup from the environment into an immutable value that
//! is passed explicitly to both codecs — never read back as ambient mutable
//! state. A missing or unusable secret fails fast here, not per-request.
//!
//! ## Recognized environment variables
//! - `ROLLCALL_SECRET` — token signing secret (required)
//! - `ROLLCALL_ISSUER` / `ROLLCALL_AUDIENCE` — embedded in every token
//! - `ROLLCALL_TOKEN_TTL_MINUTES` — token lifetime (default 60)
//! - `ROLLCALL_KDF_ITERATIONS` — PBKDF2 work factor (default 10000)
//! - `ROLLCALL_ENV` — `production` rejects the sample secret outright

/// Default token lifetime in minutes.
const DEFAULT_TTL_MINUTES: u64 = 60;

/// Default PBKDF2 iteration count for new credentials.
const DEFAULT_KDF_ITERATIONS: u32 = 10_000;

/// Sample secret shipped in development documentation. Usable for local
/// runs (with a warning), never in production.
pub const SAMPLE_SECRET: &str = "rollcall-dev-secret-change-me";

/// Immutable authentication settings for the process lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC signing secret for session tokens.
    pub secret: String,
    /// `iss` claim embedded in every issued token.
    pub issuer: String,
    /// `aud` claim embedded in every issued token.
    pub audience: String,
    /// Token lifetime in minutes.
    pub ttl_minutes: u64,
    /// PBKDF2 iteration count for newly hashed credentials.
    pub kdf_iterations: u32,
    /// Whether the process runs in production mode.
    pub production: bool,
}

impl AuthConfig {
    /// Load and validate configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let secret = std::env::var("ROLLCALL_SECRET").unwrap_or_default();
        let issuer = std::env::var("ROLLCALL_ISSUER").unwrap_or_else(|_| "rollcall".to_string());
        let audience =
            std::env::var("ROLLCALL_AUDIENCE").unwrap_or_else(|_| "rollcall".to_string());
        let production = std::env::var("ROLLCALL_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let ttl_minutes = match std::env::var("ROLLCALL_TOKEN_TTL_MINUTES") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("ROLLCALL_TOKEN_TTL_MINUTES is not an integer: {raw:?}"))?,
            Err(_) => DEFAULT_TTL_MINUTES,
        };

        let kdf_iterations = match std::env::var("ROLLCALL_KDF_ITERATIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| anyhow::anyhow!("ROLLCALL_KDF_ITERATIONS is not an integer: {raw:?}"))?,
            Err(_) => DEFAULT_KDF_ITERATIONS,
        };

        let config = Self {
            secret,
            issuer,
            audience,
            ttl_minutes,
            kdf_iterations,
            production,
        };
        config.validate()?;

        tracing::info!(
            issuer = %config.issuer,
            audience = %config.audience,
            ttl_minutes = config.ttl_minutes,
            kdf_iterations = config.kdf_iterations,
            production = config.production,
            "authentication config loaded"
        );
        Ok(config)
    }

    /// Check the invariants every configuration must satisfy.
    ///
    /// Also used by callers that construct the value by hand (tests,
    /// embedded deployments) instead of via [`AuthConfig::from_env`].
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.secret.is_empty() {
            anyhow::bail!("ROLLCALL_SECRET must be set to a non-empty signing secret");
        }
        if self.secret == SAMPLE_SECRET {
            if self.production {
                anyhow::bail!("the sample signing secret is not allowed in production");
            }
            tracing::warn!("running with the sample signing secret; do not deploy this");
        }
        if self.ttl_minutes == 0 {
            anyhow::bail!("token lifetime must be a positive number of minutes");
        }
        if self.kdf_iterations == 0 {
            anyhow::bail!("KDF iteration count must be positive");
        }
        Ok(())
    }
}
