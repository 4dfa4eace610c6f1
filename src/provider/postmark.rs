//! Postmark HTTP API backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ProviderConfig;
use crate::metrics::ProviderMetrics;

use super::{
    EmailProvider, NewProviderTemplate, ProviderError, ProviderResult, ProviderTemplate,
    ProviderTemplateEdit, SendReceipt, TemplatedEmail,
};

const TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// Error body returned by Postmark on non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkErrorBody {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

/// Postmark server API client.
pub struct PostmarkClient {
    client: reqwest::Client,
    api_base: String,
    server_token: String,
}

impl PostmarkClient {
    /// Create a client from provider settings and a server token.
    pub fn new(config: &ProviderConfig, server_token: String) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("ara-mail-service/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            server_token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.api_base, path))
            .header(TOKEN_HEADER, &self.server_token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request, recording metrics and decoding the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ProviderResult<T> {
        let started = Instant::now();
        let result = self.send_and_decode(request).await;
        ProviderMetrics::record(operation, result.is_ok(), started.elapsed());

        if let Err(e) = &result {
            tracing::warn!(operation, error = %e, "Postmark request failed");
        }

        result
    }

    async fn send_and_decode<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ProviderResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body: PostmarkErrorBody =
                serde_json::from_slice(&bytes).unwrap_or_else(|_| PostmarkErrorBody {
                    error_code: 0,
                    message: String::from_utf8_lossy(&bytes).into_owned(),
                });

            return Err(ProviderError::Api {
                status: status.as_u16(),
                code: body.error_code,
                message: body.message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl EmailProvider for PostmarkClient {
    fn backend_type(&self) -> &'static str {
        "postmark"
    }

    async fn create_template(
        &self,
        template: NewProviderTemplate,
    ) -> ProviderResult<ProviderTemplate> {
        let request = self.request(Method::POST, "/templates").json(&template);
        self.execute("create_template", request).await
    }

    async fn edit_template(
        &self,
        template_id: i64,
        edit: ProviderTemplateEdit,
    ) -> ProviderResult<ProviderTemplate> {
        let request = self
            .request(Method::PUT, &format!("/templates/{}", template_id))
            .json(&edit);
        self.execute("edit_template", request).await
    }

    async fn send_email_with_template(&self, email: TemplatedEmail) -> ProviderResult<SendReceipt> {
        let request = self.request(Method::POST, "/email/withTemplate").json(&email);
        self.execute("send_email", request).await
    }
}
