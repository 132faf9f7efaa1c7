// crates/medivault-server/src/dispatch/backend.rs
// Backend trait for the dispatcher's search and generate calls

use async_trait::async_trait;
use medivault_types::{Role, SearchResponse, SearchResult, SearchSource};

use crate::error::Result;
use crate::mock::MockResponder;

/// Where the dispatcher sends search and generate.
///
/// Implemented by the HTTP client, the in-process proxy and the offline mock.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Short label for logs
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, role: Role) -> Result<SearchResponse>;

    async fn generate(&self, query: &str, context: &[SearchResult], role: Role) -> Result<String>;
}

/// Offline backend: nothing to search, answers from the keyword responder
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

#[async_trait]
impl QueryBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(&self, _query: &str, _role: Role) -> Result<SearchResponse> {
        Ok(SearchResponse {
            results: Vec::new(),
            source: SearchSource::Demo,
            message: Some("Offline mode, no records searched".to_string()),
        })
    }

    async fn generate(&self, query: &str, _context: &[SearchResult], _role: Role) -> Result<String> {
        Ok(MockResponder.respond(query).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::DEFAULT_RESPONSE;

    #[tokio::test]
    async fn test_mock_search_is_empty() {
        let response = MockBackend.search("diabetes", Role::Doctor).await.unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_mock_generate_uses_responder() {
        let text = MockBackend
            .generate("diabetes insulin glucose", &[], Role::Admin)
            .await
            .unwrap();
        assert_eq!(text, MockResponder.respond("diabetes insulin glucose"));

        let fallback = MockBackend.generate("zzz", &[], Role::Admin).await.unwrap();
        assert_eq!(fallback, DEFAULT_RESPONSE);
    }
}
