// src/config.rs
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:8000/chat";
pub const DEFAULT_CUSTOMER_ID: &str = "CUST-001";

// Read through the binary's flags, after `.env` is loaded.
pub const ENDPOINT_ENV: &str = "CHAT_API_URL";
pub const CUSTOMER_ID_ENV: &str = "CHAT_CUSTOMER_ID";

/// Fixed settings attached to every exchange. Chosen at deploy time and
/// never edited from the chat surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint_url: Url,
    pub customer_id: String,
}

impl ClientConfig {
    pub fn new(endpoint_url: &str, customer_id: impl Into<String>) -> Result<Self, ConfigError> {
        let parsed = Url::parse(endpoint_url.trim()).map_err(|source| ConfigError::InvalidEndpoint {
            url: endpoint_url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(endpoint_url.to_string()));
        }

        let customer_id = customer_id.into().trim().to_string();
        if customer_id.is_empty() {
            return Err(ConfigError::EmptyCustomerId);
        }

        Ok(Self { endpoint_url: parsed, customer_id })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: Url::parse(DEFAULT_ENDPOINT_URL)
                .expect("default endpoint is a valid url"),
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_endpoints() {
        assert!(matches!(
            ClientConfig::new("not a url", "CUST-001"),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com/chat", "CUST-001"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn rejects_blank_customer_id() {
        assert!(matches!(
            ClientConfig::new(DEFAULT_ENDPOINT_URL, "  "),
            Err(ConfigError::EmptyCustomerId)
        ));
    }
}
