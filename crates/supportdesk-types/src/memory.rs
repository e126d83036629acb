//! Memory types for supportdesk.
//!
//! These types model conversational memory: sessions, the raw messages
//! exchanged in them, and the long-term facts extracted from those
//! exchanges. Everything is attributed to an entity (the end user) and a
//! process (the application that talked to them).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who a memory belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribution {
    /// The end user.
    pub entity_id: String,
    /// The application that produced the memory (e.g. `support_bot`).
    pub process_id: String,
}

impl Attribution {
    pub fn new(entity_id: impl Into<String>, process_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            process_id: process_id.into(),
        }
    }
}

/// A conversation session for one attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySession {
    pub id: String,
    pub entity_id: String,
    pub process_id: String,
    pub started_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MemorySession {
    /// Start a new session with a fresh `session_<12 hex>` id.
    pub fn start(attribution: &Attribution, at: DateTime<Utc>) -> Self {
        Self::with_id(generate_session_id(), attribution, at)
    }

    /// Start (or resume) a session under a caller-chosen id.
    pub fn with_id(id: impl Into<String>, attribution: &Attribution, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            entity_id: attribution.entity_id.clone(),
            process_id: attribution.process_id.clone(),
            started_at: at,
            last_active_at: at,
            ended_at: None,
        }
    }

    /// Whether `attribution` owns this session.
    pub fn belongs_to(&self, attribution: &Attribution) -> bool {
        self.entity_id == attribution.entity_id && self.process_id == attribution.process_id
    }

    /// Whether the session saw activity within `timeout_minutes` of `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, timeout_minutes: i64) -> bool {
        self.ended_at.is_none()
            && now.signed_duration_since(self.last_active_at).num_minutes() < timeout_minutes
    }
}

/// `session_` followed by 12 lowercase hex characters.
pub fn generate_session_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("session_{}", &hex[..12])
}

/// Speaker of a recorded conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationRole {
    User,
    Assistant,
}

impl fmt::Display for ConversationRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationRole::User => write!(f, "user"),
            ConversationRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for ConversationRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(ConversationRole::User),
            "assistant" => Ok(ConversationRole::Assistant),
            other => Err(format!("invalid conversation role: '{other}'")),
        }
    }
}

/// One recorded turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub session_id: String,
    pub entity_id: String,
    pub process_id: String,
    pub role: ConversationRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(
        attribution: &Attribution,
        session_id: impl Into<String>,
        role: ConversationRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            entity_id: attribution.entity_id.clone(),
            process_id: attribution.process_id.clone(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Category of an extracted fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryCategory {
    Preference,
    Fact,
    Decision,
    Context,
    Correction,
}

impl fmt::Display for MemoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryCategory::Preference => write!(f, "preference"),
            MemoryCategory::Fact => write!(f, "fact"),
            MemoryCategory::Decision => write!(f, "decision"),
            MemoryCategory::Context => write!(f, "context"),
            MemoryCategory::Correction => write!(f, "correction"),
        }
    }
}

impl FromStr for MemoryCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preference" => Ok(MemoryCategory::Preference),
            "fact" => Ok(MemoryCategory::Fact),
            "decision" => Ok(MemoryCategory::Decision),
            "context" => Ok(MemoryCategory::Context),
            "correction" => Ok(MemoryCategory::Correction),
            other => Err(format!("invalid memory category: '{other}'")),
        }
    }
}

/// A long-term fact remembered about an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryFact {
    pub id: Uuid,
    pub entity_id: String,
    pub process_id: String,
    /// Session the fact was extracted from.
    pub session_id: String,
    pub content: String,
    pub category: MemoryCategory,
    /// Importance score from 1 (low) to 5 (critical).
    pub importance: u8,
    pub created_at: DateTime<Utc>,
}

/// A fact returned by recall, with its relevance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalledMemory {
    pub fact: MemoryFact,
    /// Relevance in `[0, 1]`.
    pub similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        assert!(id.starts_with("session_"));
        assert_eq!(id.len(), "session_".len() + 12);
    }

    #[test]
    fn test_session_freshness() {
        let attr = Attribution::new("user_1", "support_bot");
        let now = Utc::now();
        let mut session = MemorySession::start(&attr, now - Duration::minutes(30));
        assert!(session.is_fresh(now, 60));

        session.last_active_at = now - Duration::minutes(61);
        assert!(!session.is_fresh(now, 60));

        session.last_active_at = now;
        session.ended_at = Some(now);
        assert!(!session.is_fresh(now, 60));
    }

    #[test]
    fn test_memory_category_roundtrip() {
        for category in [
            MemoryCategory::Preference,
            MemoryCategory::Fact,
            MemoryCategory::Decision,
            MemoryCategory::Context,
            MemoryCategory::Correction,
        ] {
            let parsed: MemoryCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_conversation_role_rejects_system() {
        assert!("system".parse::<ConversationRole>().is_err());
    }
}
