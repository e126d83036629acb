//! Chat request/response DTOs shared by the HTTP API and the CLI loop.

use serde::{Deserialize, Serialize};

/// User id applied when a request does not carry one.
pub const ANONYMOUS_USER: &str = "anonymous";

/// A user message sent to the support assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Existing session to continue; the user's active session is used otherwise.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// The effective user id, falling back to [`ANONYMOUS_USER`].
    pub fn user_id(&self) -> &str {
        match self.user_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => ANONYMOUS_USER,
        }
    }

    /// The requested session id, ignoring blank strings.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// The assistant's reply to a [`ChatRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    #[serde(default)]
    pub ticket_created: bool,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_user_id_is_anonymous() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(req.user_id(), "anonymous");
        assert!(req.session_id().is_none());
    }

    #[test]
    fn test_null_user_id_is_anonymous() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message": "hello", "user_id": null}"#).unwrap();
        assert_eq!(req.user_id(), "anonymous");
    }

    #[test]
    fn test_explicit_ids_are_kept() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message": "hello", "user_id": "user_42", "session_id": "session_abc"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id(), "user_42");
        assert_eq!(req.session_id(), Some("session_abc"));
    }

    #[test]
    fn test_response_serializes_null_ticket_id() {
        let resp = ChatResponse {
            response: "Hi".to_string(),
            session_id: "session_1".to_string(),
            ticket_created: false,
            ticket_id: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["ticket_id"], serde_json::Value::Null);
        assert_eq!(json["ticket_created"], false);
    }
}
