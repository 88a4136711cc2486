//! Error types for chat sessions

use uuid::Uuid;

/// Errors a client can cause; remote model failures are not among them
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyContent,
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("unknown config field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("unknown prompt template: {0}")]
    UnknownTemplate(String),
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("unknown export format: {0}")]
    UnknownFormat(String),
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

impl ChatError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyContent.to_string(), "message cannot be empty");
        assert_eq!(ChatError::EmptyTranscript.to_string(), "transcript is empty");
        assert_eq!(
            ChatError::UnknownField("top_p".to_string()).to_string(),
            "unknown config field: top_p"
        );
        assert_eq!(
            ChatError::invalid("temperature", "expected a number").to_string(),
            "invalid value for temperature: expected a number"
        );
        assert_eq!(
            ChatError::UnknownTemplate("Pirate".to_string()).to_string(),
            "unknown prompt template: Pirate"
        );
    }

    #[test]
    fn test_session_not_found_preserves_uuid() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            ChatError::SessionNotFound(id).to_string(),
            "session not found: 550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
