// crates/medivault-server/src/error.rs
// Standardized error types for MediVault

use thiserror::Error;

/// Main error type for the MediVault library
#[derive(Error, Debug)]
pub enum MediVaultError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no active conversation")]
    NoActiveConversation,

    #[error("conversation not found: {0}")]
    ConversationNotFound(String),

    #[error("a query is already in flight for conversation {0}")]
    QueryInFlight(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream service answered with a non-success status
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using MediVaultError
pub type Result<T> = std::result::Result<T, MediVaultError>;

impl From<String> for MediVaultError {
    fn from(s: String) -> Self {
        MediVaultError::Other(s)
    }
}

impl From<MediVaultError> for String {
    fn from(err: MediVaultError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let err = MediVaultError::InvalidInput("bad data".to_string());
        assert!(err.to_string().contains("invalid input"));
        assert!(err.to_string().contains("bad data"));
    }

    #[test]
    fn test_query_in_flight_names_conversation() {
        let err = MediVaultError::QueryInFlight("conv-1".to_string());
        assert!(err.to_string().contains("conv-1"));
    }

    #[test]
    fn test_upstream_error_format() {
        let err = MediVaultError::Upstream {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "upstream error 503: unavailable");
    }

    #[test]
    fn test_from_string() {
        let err: MediVaultError = "some error".to_string().into();
        assert!(matches!(err, MediVaultError::Other(_)));
    }

    #[test]
    fn test_into_string() {
        let err = MediVaultError::PermissionDenied("notifications".to_string());
        let s: String = err.into();
        assert!(s.contains("permission denied"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MediVaultError = io_err.into();
        assert!(matches!(err, MediVaultError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: MediVaultError = json_err.into();
        assert!(matches!(err, MediVaultError::Json(_)));
        assert!(err.to_string().contains("JSON"));
    }
}
