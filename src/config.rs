// Gateway and image proxy configuration

use std::time::Duration;
use thiserror::Error;

pub const ENV_GATEWAY_URL: &str = "SUPABASE_URL";
pub const ENV_GATEWAY_KEY: &str = "SUPABASE_ANON_KEY";
pub const ENV_TIMEOUT_MS: &str = "TRAILS_TIMEOUT_MS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

// Logical tables of the hosted store. One schema only: the timestamp-suffixed
// table names of earlier iterations are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub categories: String,
    pub destinations: String,
    pub packages: String,
    pub bookings: String,
    pub contact_submissions: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            categories: "categories".to_string(),
            destinations: "destinations".to_string(),
            packages: "packages".to_string(),
            bookings: "bookings".to_string(),
            contact_submissions: "contact_submissions".to_string(),
        }
    }
}

/// Settings for rewriting storage-hosted images through a resizing proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProxyConfig {
    pub proxy_base: String,
    /// URLs containing this substring are routed through the proxy.
    pub storage_host_marker: String,
    pub output_format: String,
    pub quality: u8,
    pub default_width: u32,
    pub placeholder: String,
}

impl Default for ImageProxyConfig {
    fn default() -> Self {
        Self {
            proxy_base: "https://wsrv.nl/".to_string(),
            storage_host_marker: "supabase.co".to_string(),
            output_format: "webp".to_string(),
            quality: 80,
            default_width: 100,
            placeholder: "/placeholder.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub tables: TableNames,
    pub image_proxy: ImageProxyConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout_ms: 10_000,
            tables: TableNames::default(),
            image_proxy: ImageProxyConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Builds the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_GATEWAY_URL)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_GATEWAY_URL))?;
        let api_key = lookup(ENV_GATEWAY_KEY)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_GATEWAY_KEY))?;

        let mut config = Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            ..Self::default()
        };

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = raw
                .trim()
                .parse()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_TIMEOUT_MS,
                    value: raw,
                })?;
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_reads_required_values() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (ENV_GATEWAY_URL, "https://abc.supabase.co/"),
            (ENV_GATEWAY_KEY, "anon-key"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://abc.supabase.co");
        assert_eq!(config.api_key, "anon-key");
        assert_eq!(config.timeout_ms, 10_000);
        assert_eq!(config.tables.bookings, "bookings");
    }

    #[test]
    fn test_missing_key_is_reported() {
        let err = GatewayConfig::from_lookup(lookup_from(&[(
            ENV_GATEWAY_URL,
            "https://abc.supabase.co",
        )]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::MissingVar(ENV_GATEWAY_KEY)));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = GatewayConfig::from_lookup(lookup_from(&[
            (ENV_GATEWAY_URL, "https://abc.supabase.co"),
            (ENV_GATEWAY_KEY, "anon-key"),
            (ENV_TIMEOUT_MS, "soon"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_timeout_override() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            (ENV_GATEWAY_URL, "https://abc.supabase.co"),
            (ENV_GATEWAY_KEY, "anon-key"),
            (ENV_TIMEOUT_MS, "2500"),
        ]))
        .unwrap();

        assert_eq!(config.timeout(), Duration::from_millis(2500));
    }
}
