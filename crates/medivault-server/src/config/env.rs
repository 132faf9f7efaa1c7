// crates/medivault-server/src/config/env.rs
// Environment-based configuration - single source of truth for all env vars

use tracing::{debug, info, warn};

/// Default vector-search service (self-hosted CyborgDB service)
pub const DEFAULT_SEARCH_BASE_URL: &str = "http://localhost:8000";

/// Default OpenAI-compatible LLM gateway endpoint
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default gateway model
pub const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";

/// API keys loaded from environment variables
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// Vector-search service key (CYBORGDB_API_KEY)
    pub search: Option<String>,
    /// Index-level encryption key (CYBORGDB_INDEX_KEY)
    pub index_key: Option<String>,
    /// LLM gateway key (LLM_GATEWAY_API_KEY)
    pub gateway: Option<String>,
}

impl ApiKeys {
    /// Load API keys from environment variables
    ///
    /// Set `MEDIVAULT_OFFLINE=1` to suppress all keys (forces mock fallbacks)
    pub fn from_env() -> Self {
        if parse_bool_env("MEDIVAULT_OFFLINE").unwrap_or(false) {
            info!("MEDIVAULT_OFFLINE is set, upstream services disabled, using fallbacks");
            return Self::default();
        }

        let keys = Self {
            search: read_var("CYBORGDB_API_KEY"),
            index_key: read_var("CYBORGDB_INDEX_KEY"),
            gateway: read_var("LLM_GATEWAY_API_KEY"),
        };
        keys.log_status();
        keys
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn has_gateway(&self) -> bool {
        self.gateway.is_some()
    }

    /// Log which services are available (without exposing values)
    fn log_status(&self) {
        let available = self.available();
        if available.is_empty() {
            warn!("No API keys configured - search and generate will use demo fallbacks");
        } else {
            debug!(keys = ?available, "API keys loaded");
        }
    }

    fn available(&self) -> Vec<&'static str> {
        let mut available = Vec::new();
        if self.search.is_some() {
            available.push("Vector search");
        }
        if self.index_key.is_some() {
            available.push("Index key");
        }
        if self.gateway.is_some() {
            available.push("LLM gateway");
        }
        available
    }

    /// Get a summary of available services
    pub fn summary(&self) -> String {
        let available = self.available();
        if available.is_empty() {
            "None".to_string()
        } else {
            available.join(", ")
        }
    }
}

/// Upstream endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Vector-search base URL (CYBORGDB_BASE_URL)
    pub search_base_url: String,
    /// Chat-completions URL (LLM_GATEWAY_URL)
    pub gateway_url: String,
    /// Model passed to the gateway (LLM_GATEWAY_MODEL)
    pub gateway_model: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            gateway_model: DEFAULT_GATEWAY_MODEL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            search_base_url: read_var("CYBORGDB_BASE_URL").unwrap_or(defaults.search_base_url),
            gateway_url: read_var("LLM_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            gateway_model: read_var("LLM_GATEWAY_MODEL").unwrap_or(defaults.gateway_model),
        }
    }
}

/// Configuration validation result
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Format as a human-readable report
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        if !self.errors.is_empty() {
            lines.push("Errors:".to_string());
            for err in &self.errors {
                lines.push(format!("  - {}", err));
            }
        }

        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            for warn in &self.warnings {
                lines.push(format!("  - {}", warn));
            }
        }

        if lines.is_empty() {
            "Configuration OK".to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// Environment configuration - all env vars in one place
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_keys: ApiKeys,
    pub endpoints: Endpoints,
}

impl EnvConfig {
    /// Load all environment configuration (call once at startup)
    pub fn load() -> Self {
        info!("Loading environment configuration");

        Self {
            api_keys: ApiKeys::from_env(),
            endpoints: Endpoints::from_env(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if !self.api_keys.has_search() {
            validation.add_warning(
                "CYBORGDB_API_KEY not set. Search will always return demo records.",
            );
        }
        if !self.api_keys.has_gateway() {
            validation.add_warning(
                "LLM_GATEWAY_API_KEY not set. Generate will always return template answers.",
            );
        }
        if self.api_keys.index_key.is_none() && self.api_keys.has_search() {
            validation.add_warning("CYBORGDB_INDEX_KEY not set. Index-level key will be omitted.");
        }

        if let Err(e) = url::Url::parse(&self.endpoints.search_base_url) {
            validation.add_error(format!(
                "Invalid CYBORGDB_BASE_URL '{}': {}",
                self.endpoints.search_base_url, e
            ));
        }
        if let Err(e) = url::Url::parse(&self.endpoints.gateway_url) {
            validation.add_error(format!(
                "Invalid LLM_GATEWAY_URL '{}': {}",
                self.endpoints.gateway_url, e
            ));
        }

        validation
    }
}

/// Read a single variable, filtering empty values
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|k| !k.trim().is_empty())
}

fn parse_bool_env(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?.to_lowercase();
    match value.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_summary_empty() {
        let keys = ApiKeys::default();
        assert!(!keys.has_search());
        assert!(!keys.has_gateway());
        assert_eq!(keys.summary(), "None");
    }

    #[test]
    fn test_api_keys_with_values() {
        let keys = ApiKeys {
            search: Some("sk".to_string()),
            index_key: None,
            gateway: Some("gk".to_string()),
        };
        assert!(keys.has_search());
        assert_eq!(keys.summary(), "Vector search, LLM gateway");
    }

    #[test]
    fn test_endpoints_default() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.search_base_url, DEFAULT_SEARCH_BASE_URL);
        assert_eq!(endpoints.gateway_model, DEFAULT_GATEWAY_MODEL);
    }

    #[test]
    fn test_validation_no_keys_is_still_valid() {
        let validation = EnvConfig::default().validate();
        assert!(validation.is_valid());
        assert_eq!(validation.warnings.len(), 2);
    }

    #[test]
    fn test_validation_bad_url_is_error() {
        let mut config = EnvConfig::default();
        config.endpoints.gateway_url = "not a url".to_string();
        let validation = config.validate();
        assert!(!validation.is_valid());
        assert!(validation.report().contains("LLM_GATEWAY_URL"));
    }

    #[test]
    fn test_report_ok() {
        assert_eq!(ConfigValidation::default().report(), "Configuration OK");
    }
}
