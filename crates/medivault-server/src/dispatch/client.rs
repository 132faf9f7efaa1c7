// crates/medivault-server/src/dispatch/client.rs
// HTTP backend: posts actions to a running proxy's /api/query

use async_trait::async_trait;
use medivault_types::{ErrorBody, GenerateResponse, QueryRequest, Role, SearchResponse, SearchResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::backend::QueryBackend;
use crate::error::{MediVaultError, Result};

pub const QUERY_PATH: &str = "/api/query";

#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    endpoint: String,
}

impl ProxyClient {
    /// `base_url` is the proxy root, e.g. `http://localhost:3030`
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), QUERY_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<T: DeserializeOwned>(&self, request: &QueryRequest) -> Result<T> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // prefer the proxy's {error} envelope, fall back to the raw body
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(MediVaultError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = %status, bytes = body.len(), "Proxy responded");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl QueryBackend for ProxyClient {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self, query), fields(endpoint = %self.endpoint))]
    async fn search(&self, query: &str, role: Role) -> Result<SearchResponse> {
        let request = QueryRequest {
            action: "search".to_string(),
            query: Some(query.to_string()),
            role: Some(role),
            ..Default::default()
        };
        self.post(&request).await
    }

    #[instrument(skip(self, query, context), fields(endpoint = %self.endpoint))]
    async fn generate(&self, query: &str, context: &[SearchResult], role: Role) -> Result<String> {
        let request = QueryRequest {
            action: "generate".to_string(),
            query: Some(query.to_string()),
            context: Some(context.to_vec()),
            role: Some(role),
            ..Default::default()
        };
        let response: GenerateResponse = self.post(&request).await?;
        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_join() {
        let client = ProxyClient::new(Client::new(), "http://localhost:3030/");
        assert_eq!(client.endpoint(), "http://localhost:3030/api/query");

        let client = ProxyClient::new(Client::new(), "http://localhost:3030");
        assert_eq!(client.endpoint(), "http://localhost:3030/api/query");
    }

    #[tokio::test]
    async fn test_unreachable_proxy_is_error() {
        // port 9 (discard) is not listening on test hosts
        let client = ProxyClient::new(Client::new(), "http://127.0.0.1:9");
        assert!(client.search("q", Role::Doctor).await.is_err());
    }
}
