// crates/medivault-server/src/proxy/gateway.rs
// OpenAI-compatible chat-completions client for the LLM gateway

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use crate::error::MediVaultError;

/// Gateway outcomes the proxy must tell apart
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway rate limit exceeded")]
    RateLimited,

    #[error("gateway credits exhausted")]
    CreditsExhausted,

    #[error(transparent)]
    Failed(#[from] MediVaultError),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Failed(MediVaultError::Http(err))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Chat completion request (OpenAI-compatible format)
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl GatewayClient {
    pub fn new(http: Client, url: String, api_key: String, model: String) -> Self {
        Self {
            http,
            url,
            api_key,
            model,
        }
    }

    /// One completion: system prompt plus the user's question.
    ///
    /// 429 and 402 map to their own variants; an empty answer is a failure.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn complete(&self, system: &str, question: &str) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(question)],
            temperature: Some(0.3),
        };

        let start = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Gateway returned 429");
                return Err(GatewayError::RateLimited);
            }
            StatusCode::PAYMENT_REQUIRED => {
                warn!("Gateway returned 402");
                return Err(GatewayError::CreditsExhausted);
            }
            s if !s.is_success() => {
                let message = response.text().await.unwrap_or_default();
                warn!(status = %s, "Gateway error");
                return Err(MediVaultError::Upstream {
                    status: s.as_u16(),
                    message,
                }
                .into());
            }
            _ => {}
        }

        let body = response.text().await?;
        let content = parse_completion(&body)?;
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Gateway completion received"
        );
        Ok(content)
    }
}

/// First choice's text; missing or blank content is an error
fn parse_completion(body: &str) -> Result<String, MediVaultError> {
    let data: ChatResponse = serde_json::from_str(body)?;
    data.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| MediVaultError::Other("gateway returned no content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "test-model".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            temperature: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "test-model");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Answer"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Answer");
    }

    #[test]
    fn test_parse_completion_empty() {
        assert!(parse_completion(r#"{"choices":[]}"#).is_err());
        assert!(parse_completion(r#"{"choices":[{"message":{"content":"  "}}]}"#).is_err());
        assert!(parse_completion("not json").is_err());
    }
}
