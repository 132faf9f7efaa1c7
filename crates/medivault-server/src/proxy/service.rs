// crates/medivault-server/src/proxy/service.rs
// Action handlers behind POST /api/query: search, index, generate with fallbacks

use async_trait::async_trait;
use medivault_types::{
    GenerateResponse, GenerateSource, IndexResponse, QueryRequest, Role, SearchResponse,
    SearchResult, SearchSource,
};
use tracing::{info, warn};

use super::error::ProxyError;
use super::gateway::{GatewayClient, GatewayError};
use super::prompt::system_prompt;
use super::search::VectorSearchClient;
use crate::config::{EnvConfig, MediVaultConfig};
use crate::config::file::{DEFAULT_INDEX_NAME, DEFAULT_TOP_K};
use crate::dispatch::QueryBackend;
use crate::error::Result;
use crate::mock::{demo_results, template_for};

const SEARCH_NOT_CONFIGURED: &str = "Vector search not configured, showing demo records";
const GATEWAY_NOT_CONFIGURED: &str = "LLM gateway not configured, using template response";

/// Requested proxy operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Search,
    Index,
    Generate,
}

impl Action {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "search" => Some(Action::Search),
            "index" => Some(Action::Index),
            "generate" => Some(Action::Generate),
            _ => None,
        }
    }
}

/// Upstream clients plus request defaults. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ProxyService {
    search: Option<VectorSearchClient>,
    gateway: Option<GatewayClient>,
    index_name: String,
    top_k: u32,
}

impl Default for ProxyService {
    /// No upstreams: every call takes the fallback path
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl ProxyService {
    pub fn new(search: Option<VectorSearchClient>, gateway: Option<GatewayClient>) -> Self {
        Self {
            search,
            gateway,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Index and result count used when a request names none
    pub fn with_defaults(mut self, index_name: impl Into<String>, top_k: u32) -> Self {
        self.index_name = index_name.into();
        self.top_k = top_k;
        self
    }

    /// Wire upstream clients from configuration. Services without a key stay
    /// disabled; an unusable search URL disables search with a warning.
    pub fn from_config(env: &EnvConfig, file: &MediVaultConfig, http: reqwest::Client) -> Self {
        let search = env.api_keys.search.as_ref().and_then(|key| {
            match VectorSearchClient::new(
                http.clone(),
                &env.endpoints.search_base_url,
                key.clone(),
                env.api_keys.index_key.clone(),
            ) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "Vector search disabled");
                    None
                }
            }
        });

        let gateway = env.api_keys.gateway.as_ref().map(|key| {
            GatewayClient::new(
                http.clone(),
                env.endpoints.gateway_url.clone(),
                key.clone(),
                env.endpoints.gateway_model.clone(),
            )
        });

        info!(
            search = search.is_some(),
            gateway = gateway.is_some(),
            "Proxy service configured"
        );
        Self::new(search, gateway).with_defaults(&file.search.index_name, file.search.top_k)
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    /// Vector search with demo-record fallback. Never fails.
    pub async fn handle_search(&self, request: &QueryRequest) -> SearchResponse {
        let query = request.query.as_deref().unwrap_or_default();
        let role = request.role.unwrap_or_default();
        let top_k = request.top_k.unwrap_or(self.top_k);
        let index_name = request.index_name.as_deref().unwrap_or(&self.index_name);

        let Some(client) = &self.search else {
            return demo_response(role, query, top_k, SEARCH_NOT_CONFIGURED.to_string());
        };

        match client.query(index_name, query, top_k).await {
            Ok(results) => SearchResponse {
                results,
                source: SearchSource::Cyborgdb,
                message: None,
            },
            Err(e) => {
                warn!(error = %e, index = index_name, "Vector search failed, serving demo records");
                demo_response(
                    role,
                    query,
                    top_k,
                    format!("Vector search unavailable ({}), showing demo records", e),
                )
            }
        }
    }

    /// Create the index and upsert documents. No fallback.
    pub async fn handle_index(&self, request: &QueryRequest) -> std::result::Result<IndexResponse, ProxyError> {
        let client = self.search.as_ref().ok_or_else(|| {
            ProxyError::Internal("Vector search service is not configured".to_string())
        })?;
        let documents = request
            .documents
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ProxyError::Internal("No documents provided".to_string()))?;
        let index_name = request.index_name.as_deref().unwrap_or(&self.index_name);

        client.create_index(index_name).await?;
        client.upsert(index_name, documents).await?;

        info!(index = index_name, count = documents.len(), "Documents indexed");
        Ok(IndexResponse {
            success: true,
            index_name: index_name.to_string(),
            indexed: documents.len(),
        })
    }

    /// Gateway completion with template fallback.
    ///
    /// Only rate limiting and exhausted credits surface as errors.
    pub async fn handle_generate(
        &self,
        request: &QueryRequest,
    ) -> std::result::Result<GenerateResponse, ProxyError> {
        let query = request.query.as_deref().unwrap_or_default();
        let role = request.role.unwrap_or_default();

        let Some(gateway) = &self.gateway else {
            return Ok(template_response(role, query, GATEWAY_NOT_CONFIGURED.to_string()));
        };

        let context = request.context.as_deref().unwrap_or_default();
        let system = system_prompt(role, context);

        match gateway.complete(&system, query).await {
            Ok(response) => Ok(GenerateResponse {
                response,
                source: GenerateSource::Ai,
                message: None,
            }),
            Err(GatewayError::RateLimited) => Err(ProxyError::RateLimited),
            Err(GatewayError::CreditsExhausted) => Err(ProxyError::CreditsExhausted),
            Err(GatewayError::Failed(e)) => {
                warn!(error = %e, "Gateway failed, serving template response");
                Ok(template_response(
                    role,
                    query,
                    format!("AI generation unavailable ({}), using template response", e),
                ))
            }
        }
    }
}

fn demo_response(role: Role, query: &str, top_k: u32, message: String) -> SearchResponse {
    SearchResponse {
        results: demo_results(role, query, top_k as usize),
        source: SearchSource::Demo,
        message: Some(message),
    }
}

fn template_response(role: Role, query: &str, message: String) -> GenerateResponse {
    GenerateResponse {
        response: template_for(role, query).to_string(),
        source: GenerateSource::Template,
        message: Some(message),
    }
}

/// In-process backend: dispatch without an HTTP hop
#[async_trait]
impl QueryBackend for ProxyService {
    fn name(&self) -> &'static str {
        "in-process"
    }

    async fn search(&self, query: &str, role: Role) -> Result<SearchResponse> {
        let request = QueryRequest {
            action: "search".to_string(),
            query: Some(query.to_string()),
            role: Some(role),
            ..Default::default()
        };
        Ok(self.handle_search(&request).await)
    }

    async fn generate(&self, query: &str, context: &[SearchResult], role: Role) -> Result<String> {
        let request = QueryRequest {
            action: "generate".to_string(),
            query: Some(query.to_string()),
            context: Some(context.to_vec()),
            role: Some(role),
            ..Default::default()
        };
        let response = self.handle_generate(&request).await?;
        Ok(response.response)
    }
}
