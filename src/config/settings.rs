use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Transactional email provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Backend type: "postmark" or "memory"
    #[serde(default = "default_provider_backend")]
    pub backend: String,
    /// Base URL of the provider API
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Server API token (POSTMARK_KEY)
    #[serde(default)]
    pub server_token: Option<String>,
    /// Sender address for outgoing email (POSTMARK_FROM)
    #[serde(default = "default_from")]
    pub from: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Trace sampling ratio (0.0-1.0)
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3333
}

fn default_provider_backend() -> String {
    "postmark".to_string()
}

fn default_api_base() -> String {
    "https://api.postmarkapp.com".to_string()
}

fn default_from() -> String {
    "no-reply@localhost".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "ara-mail-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3333)?
            .set_default("provider.backend", "postmark")?
            .set_default("provider.api_base", "https://api.postmarkapp.com")?
            .set_default("provider.timeout_seconds", 30)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER__PORT, PROVIDER__SERVER_TOKEN, OTEL__ENABLED, etc.
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            // Plain variable names kept from the original deployment
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("provider.server_token", env::var("POSTMARK_KEY").ok())?
            .set_override_option("provider.from", env::var("POSTMARK_FROM").ok())?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: default_provider_backend(),
            api_base: default_api_base(),
            server_token: None,
            from: default_from(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3333);
    }

    #[test]
    fn test_provider_defaults() {
        let provider = ProviderConfig::default();
        assert_eq!(provider.backend, "postmark");
        assert_eq!(provider.api_base, "https://api.postmarkapp.com");
        assert!(provider.server_token.is_none());
        assert_eq!(provider.timeout_seconds, 30);
    }

    #[test]
    fn test_deserialize_partial_provider_section() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "provider": { "backend": "memory", "from": "team@example.com" }
        }))
        .unwrap();

        assert_eq!(settings.provider.backend, "memory");
        assert_eq!(settings.provider.from, "team@example.com");
        assert_eq!(settings.provider.timeout_seconds, 30);
        assert_eq!(settings.server.port, 3333);
        assert!(!settings.otel.enabled);
    }
}
