//! Provider backend factory

use std::sync::Arc;

use crate::config::ProviderConfig;

use super::memory::MemoryProvider;
use super::postmark::PostmarkClient;
use super::EmailProvider;

/// Create a provider backend based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"postmark"`: Returns a `PostmarkClient` if a server token is configured
/// - `"memory"`: Returns a `MemoryProvider`
///
/// # Example
///
/// ```rust,ignore
/// let provider = create_provider(&settings.provider);
/// ```
pub fn create_provider(settings: &ProviderConfig) -> Arc<dyn EmailProvider> {
    match settings.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating memory email provider");
            Arc::new(MemoryProvider::new())
        }
        other => {
            if other != "postmark" {
                tracing::warn!(backend = %other, "Unknown provider backend, using postmark");
            }

            match settings.server_token.as_deref().filter(|t| !t.is_empty()) {
                Some(token) => match PostmarkClient::new(settings, token.to_string()) {
                    Ok(client) => {
                        tracing::info!(
                            backend = "postmark",
                            api_base = %settings.api_base,
                            "Creating Postmark email provider"
                        );
                        Arc::new(client)
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "Failed to build Postmark client, falling back to memory"
                        );
                        Arc::new(MemoryProvider::new())
                    }
                },
                None => {
                    tracing::warn!(
                        "Postmark backend requested but no server token provided, falling back to memory"
                    );
                    Arc::new(MemoryProvider::new())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let config = ProviderConfig {
            backend: "memory".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(create_provider(&config).backend_type(), "memory");
    }

    #[test]
    fn test_postmark_without_token_falls_back() {
        let config = ProviderConfig::default();
        assert_eq!(create_provider(&config).backend_type(), "memory");
    }

    #[test]
    fn test_postmark_with_token() {
        let config = ProviderConfig {
            server_token: Some("server-token".to_string()),
            ..ProviderConfig::default()
        };
        assert_eq!(create_provider(&config).backend_type(), "postmark");
    }
}
