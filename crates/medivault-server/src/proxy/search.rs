// crates/medivault-server/src/proxy/search.rs
// Client for the encrypted vector-search service (CyborgDB REST API)

use medivault_types::{IndexDocument, SearchResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{MediVaultError, Result};

const API_KEY_HEADER: &str = "X-API-Key";
const EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Clone)]
pub struct VectorSearchClient {
    http: Client,
    base_url: Url,
    api_key: String,
    index_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    index_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index_key: Option<&'a str>,
    query_contents: &'a str,
    top_k: u32,
    include: [&'static str; 3],
}

#[derive(Debug, Serialize)]
struct CreateIndexBody<'a> {
    index_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index_key: Option<&'a str>,
    index_config: Value,
    embedding_model: &'static str,
}

#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    index_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    index_key: Option<&'a str>,
    items: Vec<UpsertItem<'a>>,
}

#[derive(Debug, Serialize)]
struct UpsertItem<'a> {
    id: &'a str,
    contents: &'a str,
    metadata: &'a Value,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Hits,
}

/// The service returns a flat list for single queries and nested lists for batches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Hits {
    Flat(Vec<Hit>),
    Batched(Vec<Vec<Hit>>),
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: String,
    #[serde(default)]
    distance: Option<f32>,
    #[serde(default)]
    metadata: Value,
    #[serde(default)]
    contents: Option<Value>,
}

impl Hit {
    fn into_result(self) -> SearchResult {
        let content = match self.contents {
            Some(Value::String(s)) => s,
            _ => self
                .metadata
                .get("content")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        };
        SearchResult {
            id: self.id,
            score: self.distance.map(|d| (1.0 - d).clamp(0.0, 1.0)).unwrap_or(0.0),
            content,
            metadata: self.metadata,
        }
    }
}

impl VectorSearchClient {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: String,
        index_key: Option<String>,
    ) -> Result<Self> {
        // join() replaces the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| MediVaultError::Config(format!("invalid search URL '{}': {}", base_url, e)))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            index_key,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| MediVaultError::Config(format!("invalid endpoint '{}': {}", path, e)))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// Semantic query over an index
    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn query(&self, index_name: &str, query: &str, top_k: u32) -> Result<Vec<SearchResult>> {
        let body = QueryBody {
            index_name,
            index_key: self.index_key.as_deref(),
            query_contents: query,
            top_k,
            include: ["distance", "metadata", "contents"],
        };
        let response = ensure_success(self.post("v1/indexes/query", &body).await?).await?;
        let parsed: QueryResponse = response.json().await?;

        let hits = match parsed.results {
            Hits::Flat(hits) => hits,
            Hits::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        };
        let results: Vec<SearchResult> = hits.into_iter().map(Hit::into_result).collect();
        debug!(count = results.len(), "Vector search returned results");
        Ok(results)
    }

    /// Create an index. An existing index (409) counts as success.
    #[instrument(skip(self))]
    pub async fn create_index(&self, index_name: &str) -> Result<()> {
        let body = CreateIndexBody {
            index_name,
            index_key: self.index_key.as_deref(),
            index_config: serde_json::json!({ "type": "ivfflat" }),
            embedding_model: EMBEDDING_MODEL,
        };
        let response = self.post("v1/indexes/create", &body).await?;
        if response.status() == StatusCode::CONFLICT {
            debug!(index = index_name, "Index already exists");
            return Ok(());
        }
        ensure_success(response).await?;
        info!(index = index_name, "Index created");
        Ok(())
    }

    /// Upsert documents (embedded server-side from their contents)
    #[instrument(skip(self, documents), fields(count = documents.len()))]
    pub async fn upsert(&self, index_name: &str, documents: &[IndexDocument]) -> Result<()> {
        let body = UpsertBody {
            index_name,
            index_key: self.index_key.as_deref(),
            items: documents
                .iter()
                .map(|d| UpsertItem {
                    id: &d.id,
                    contents: &d.content,
                    metadata: &d.metadata,
                })
                .collect(),
        };
        ensure_success(self.post("v1/vectors/upsert", &body).await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(MediVaultError::Upstream {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let client =
            VectorSearchClient::new(Client::new(), "http://localhost:8000/api", "k".into(), None)
                .unwrap();
        assert_eq!(
            client.endpoint("v1/indexes/query").unwrap().as_str(),
            "http://localhost:8000/api/v1/indexes/query"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = VectorSearchClient::new(Client::new(), "not a url", "k".into(), None);
        assert!(matches!(result, Err(MediVaultError::Config(_))));
    }

    #[test]
    fn test_parse_flat_hits() {
        let json = r#"{"results": [
            {"id": "a", "distance": 0.1, "metadata": {"k": 1}, "contents": "first"},
            {"id": "b", "metadata": {"content": "from metadata"}}
        ]}"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        let Hits::Flat(hits) = parsed.results else {
            panic!("expected flat hits");
        };
        let results: Vec<SearchResult> = hits.into_iter().map(Hit::into_result).collect();
        assert_eq!(results[0].content, "first");
        assert!((results[0].score - 0.9).abs() < 1e-6);
        assert_eq!(results[1].content, "from metadata");
        assert_eq!(results[1].score, 0.0);
    }

    #[test]
    fn test_parse_batched_hits() {
        let json = r#"{"results": [[{"id": "a", "distance": 0.2}]]}"#;
        let parsed: QueryResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(parsed.results, Hits::Batched(ref b) if b[0].len() == 1));
    }

    #[test]
    fn test_query_body_omits_missing_index_key() {
        let body = QueryBody {
            index_name: "records",
            index_key: None,
            query_contents: "q",
            top_k: 3,
            include: ["distance", "metadata", "contents"],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("index_key").is_none());
        assert_eq!(json["top_k"], 3);
    }
}
