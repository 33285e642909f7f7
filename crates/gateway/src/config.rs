//! Environment-driven configuration of the gateway.

use std::net::SocketAddr;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LEDGER_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_USERS_API_URL: &str = "http://127.0.0.1:8090";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    /// Base URL of the ledger service, without a trailing slash.
    pub ledger_api_url: String,
    pub users_api_url: String,
}

impl GatewayConfig {
    pub fn new(ledger_api_url: impl Into<String>, users_api_url: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            ledger_api_url: trim_base(ledger_api_url.into()),
            users_api_url: trim_base(users_api_url.into()),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_opt("GATEWAY_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("invalid GATEWAY_BIND_ADDR")?;

        let mut config = Self::new(
            env_opt("LEDGER_API_URL").unwrap_or_else(|| DEFAULT_LEDGER_API_URL.to_string()),
            env_opt("USERS_API_URL").unwrap_or_else(|| DEFAULT_USERS_API_URL.to_string()),
        );
        config.bind_addr = bind_addr;
        Ok(config)
    }
}

fn trim_base(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_dropped_from_base_urls() {
        let config = GatewayConfig::new("http://ledger:8080/", "http://users:8090//");
        assert_eq!(config.ledger_api_url, "http://ledger:8080");
        assert_eq!(config.users_api_url, "http://users:8090");
    }
}
