//! Environment-driven configuration of the ledger service.

use std::net::SocketAddr;

use anyhow::Context;

use moneta_auth::DEFAULT_IDENTITY_CLAIM;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// When set, tokens must carry this `iss`.
    pub jwt_issuer: Option<String>,
    pub identity_claim: String,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl ApiConfig {
    /// In-memory configuration with the given signing secret (tests/dev).
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.into(),
            jwt_issuer: None,
            identity_claim: DEFAULT_IDENTITY_CLAIM.to_string(),
            database_url: None,
            max_connections: 5,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_opt("LEDGER_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("invalid LEDGER_BIND_ADDR")?;

        let jwt_secret = env_opt("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let max_connections = match env_opt("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("invalid DATABASE_MAX_CONNECTIONS")?,
            None => 5,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_issuer: env_opt("JWT_ISSUER"),
            identity_claim: env_opt("IDENTITY_CLAIM").unwrap_or_else(|| DEFAULT_IDENTITY_CLAIM.to_string()),
            database_url: env_opt("DATABASE_URL"),
            max_connections,
        })
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("identity_claim", &self.identity_claim)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
