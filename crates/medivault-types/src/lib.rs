// crates/medivault-types/src/lib.rs
// Shared types for MediVault (domain records + proxy wire payloads)
// No server-only dependencies allowed here

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════
// USERS
// ═══════════════════════════════════════

/// Role of a signed-in user. Drives prompt wording, demo records and templates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Doctor,
    Clinician,
    Admin,
    Researcher,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Doctor, Role::Clinician, Role::Admin, Role::Researcher];

    /// Parse role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "doctor" => Some(Self::Doctor),
            "clinician" => Some(Self::Clinician),
            "admin" => Some(Self::Admin),
            "researcher" => Some(Self::Researcher),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doctor => "doctor",
            Self::Clinician => "clinician",
            Self::Admin => "admin",
            Self::Researcher => "researcher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Avatar initials, e.g. "SC"
    pub avatar: String,
    pub department: String,
}

// ═══════════════════════════════════════
// CONVERSATIONS
// ═══════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Decorative digest shown next to the bubble
    pub encrypted_hash: String,
    #[serde(default = "default_true")]
    pub is_encrypted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Phase of the simulated encrypt/search/decrypt pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncryptionStatus {
    #[default]
    Idle,
    Encrypting,
    Searching,
    Decrypting,
    Complete,
}

impl fmt::Display for EncryptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Encrypting => "encrypting",
            Self::Searching => "searching",
            Self::Decrypting => "decrypting",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

// ═══════════════════════════════════════
// DASHBOARD RECORDS
// ═══════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceMetric {
    pub timestamp: DateTime<Utc>,
    pub query_latency_ms: u32,
    pub encryption_overhead: u32,
    pub records_searched: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Query,
    Access,
    Retrieval,
    Login,
    Logout,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Access => "access",
            Self::Retrieval => "retrieval",
            Self::Login => "login",
            Self::Logout => "logout",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failed,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_role: Role,
    pub action: AuditAction,
    pub description: String,
    pub encryption_method: String,
    pub status: AuditStatus,
}

// ═══════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    Concise,
    #[default]
    Detailed,
    Clinical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EncryptionLevel {
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
    #[serde(rename = "aes-128-gcm")]
    Aes128Gcm,
}

impl EncryptionLevel {
    /// Label written into audit entries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Aes256Gcm => "AES-256-GCM",
            Self::Aes128Gcm => "AES-128-GCM",
        }
    }
}

/// User preferences. Missing fields fall back to defaults on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub compact_mode: bool,
    pub notifications: bool,
    pub sound_effects: bool,
    pub show_encryption_badges: bool,
    pub auto_scroll: bool,
    pub response_style: ResponseStyle,
    pub encryption_level: EncryptionLevel,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            compact_mode: false,
            notifications: false,
            sound_effects: false,
            show_encryption_badges: true,
            auto_scroll: true,
            response_style: ResponseStyle::default(),
            encryption_level: EncryptionLevel::default(),
        }
    }
}

/// Partial settings update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub dark_mode: Option<bool>,
    pub compact_mode: Option<bool>,
    pub notifications: Option<bool>,
    pub sound_effects: Option<bool>,
    pub show_encryption_badges: Option<bool>,
    pub auto_scroll: Option<bool>,
    pub response_style: Option<ResponseStyle>,
    pub encryption_level: Option<EncryptionLevel>,
}

impl AppSettings {
    /// Apply a patch in place
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.dark_mode {
            self.dark_mode = v;
        }
        if let Some(v) = patch.compact_mode {
            self.compact_mode = v;
        }
        if let Some(v) = patch.notifications {
            self.notifications = v;
        }
        if let Some(v) = patch.sound_effects {
            self.sound_effects = v;
        }
        if let Some(v) = patch.show_encryption_badges {
            self.show_encryption_badges = v;
        }
        if let Some(v) = patch.auto_scroll {
            self.auto_scroll = v;
        }
        if let Some(v) = patch.response_style {
            self.response_style = v;
        }
        if let Some(v) = patch.encryption_level {
            self.encryption_level = v;
        }
    }
}

// ═══════════════════════════════════════
// PROXY WIRE FORMAT
// ═══════════════════════════════════════

/// Body of `POST /api/query`. `action` stays a string so unknown actions
/// can be answered with a 400 rather than a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents: Option<Vec<IndexDocument>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<SearchResult>>,
    /// Unrecognised roles read as absent
    #[serde(
        default,
        deserialize_with = "lenient_role",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Role::from_str))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexDocument {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Cyborgdb,
    Demo,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub source: SearchSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerateSource {
    Ai,
    Template,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    pub response: String,
    pub source: GenerateSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    pub success: bool,
    pub index_name: String,
    pub indexed: usize,
}

/// Error envelope returned by the proxy for every non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // Role tests
    // ============================================================================

    #[test]
    fn test_role_serialize() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
        assert_eq!(serde_json::to_string(&Role::Researcher).unwrap(), "\"researcher\"");
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!(Role::from_str("Clinician"), Some(Role::Clinician));
        assert_eq!(Role::from_str(" admin "), Some(Role::Admin));
        assert_eq!(Role::from_str("nurse"), None);
    }

    #[test]
    fn test_role_display_matches_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role));
        }
    }

    // ============================================================================
    // Settings tests
    // ============================================================================

    #[test]
    fn test_settings_partial_json_uses_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"dark_mode": true}"#).unwrap();
        assert!(settings.dark_mode);
        assert!(settings.show_encryption_badges);
        assert!(settings.auto_scroll);
        assert_eq!(settings.response_style, ResponseStyle::Detailed);
    }

    #[test]
    fn test_settings_apply_patch() {
        let mut settings = AppSettings::default();
        let patch = SettingsPatch {
            compact_mode: Some(true),
            response_style: Some(ResponseStyle::Clinical),
            ..Default::default()
        };
        settings.apply(&patch);
        assert!(settings.compact_mode);
        assert_eq!(settings.response_style, ResponseStyle::Clinical);
        assert!(!settings.dark_mode);
    }

    #[test]
    fn test_settings_patch_rejects_unknown_field() {
        let result = serde_json::from_str::<SettingsPatch>(r#"{"volume": 3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encryption_level_serialize() {
        assert_eq!(
            serde_json::to_string(&EncryptionLevel::Aes128Gcm).unwrap(),
            "\"aes-128-gcm\""
        );
        assert_eq!(
            serde_json::to_string(&EncryptionLevel::Aes256Gcm).unwrap(),
            "\"aes-256-gcm\""
        );
        assert_eq!(EncryptionLevel::Aes256Gcm.label(), "AES-256-GCM");
    }

    #[test]
    fn test_settings_with_encryption_level_keep_other_fields() {
        let json = r#"{"dark_mode": true, "encryption_level": "aes-128-gcm"}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert!(settings.dark_mode);
        assert_eq!(settings.encryption_level, EncryptionLevel::Aes128Gcm);
    }

    // ============================================================================
    // Wire format tests
    // ============================================================================

    #[test]
    fn test_query_request_camel_case() {
        let json = r#"{"action": "search", "query": "diabetes", "indexName": "records", "topK": 3}"#;
        let req: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.action, "search");
        assert_eq!(req.index_name.as_deref(), Some("records"));
        assert_eq!(req.top_k, Some(3));
        assert!(req.role.is_none());
    }

    #[test]
    fn test_query_request_unknown_action_still_parses() {
        let req: QueryRequest = serde_json::from_str(r#"{"action": "bogus"}"#).unwrap();
        assert_eq!(req.action, "bogus");
        assert!(req.query.is_none());
    }

    #[test]
    fn test_query_request_missing_action_is_empty() {
        let req: QueryRequest = serde_json::from_str(r#"{"query": "diabetes"}"#).unwrap();
        assert!(req.action.is_empty());
    }

    #[test]
    fn test_query_request_unknown_role_reads_as_none() {
        let req: QueryRequest =
            serde_json::from_str(r#"{"action": "search", "role": "nurse"}"#).unwrap();
        assert!(req.role.is_none());
        let req: QueryRequest =
            serde_json::from_str(r#"{"action": "search", "role": "Clinician"}"#).unwrap();
        assert_eq!(req.role, Some(Role::Clinician));
    }

    #[test]
    fn test_search_response_omits_empty_message() {
        let resp = SearchResponse {
            results: vec![],
            source: SearchSource::Demo,
            message: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"results":[],"source":"demo"}"#);
    }

    #[test]
    fn test_message_is_encrypted_defaults_true() {
        let json = r#"{
            "id": "m1",
            "role": "assistant",
            "content": "hi",
            "timestamp": "2024-01-01T00:00:00Z",
            "encrypted_hash": "abc"
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        assert!(msg.is_encrypted);
        assert_eq!(msg.role, MessageRole::Assistant);
    }

    #[test]
    fn test_encryption_status_default_idle() {
        assert_eq!(EncryptionStatus::default(), EncryptionStatus::Idle);
        assert_eq!(EncryptionStatus::Decrypting.to_string(), "decrypting");
    }
}
