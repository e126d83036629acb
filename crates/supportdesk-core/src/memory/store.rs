//! MemoryRepository trait definition.
//!
//! Provides persistence for conversation sessions, their messages, and the
//! long-term facts extracted from them. Follows the RPITIT repository pattern.

use chrono::{DateTime, Utc};
use supportdesk_types::error::RepositoryError;
use supportdesk_types::memory::{Attribution, ConversationMessage, MemoryFact, MemorySession};

/// Repository trait for conversational memory.
///
/// Implementations live in supportdesk-infra (e.g., `SqliteMemoryRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MemoryRepository: Send + Sync {
    /// The most recently active, not-ended session for an attribution.
    fn active_session(
        &self,
        attribution: &Attribution,
    ) -> impl std::future::Future<Output = Result<Option<MemorySession>, RepositoryError>> + Send;

    /// Look up a session by id, whoever owns it.
    fn find_session(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<MemorySession>, RepositoryError>> + Send;

    /// Insert a session, or refresh `last_active_at` and clear `ended_at` if it
    /// exists. An existing session owned by another attribution is left untouched.
    fn upsert_session(
        &self,
        session: &MemorySession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// End every open session of an attribution. Returns how many were ended.
    fn end_sessions(
        &self,
        attribution: &Attribution,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Persist one conversation message.
    fn save_message(
        &self,
        message: &ConversationMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The last `limit` messages of a session written under `attribution`, oldest first.
    fn recent_messages(
        &self,
        attribution: &Attribution,
        session_id: &str,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationMessage>, RepositoryError>> + Send;

    /// Save a fact. Saving the same content twice for an attribution is a no-op.
    fn save_fact(
        &self,
        fact: &MemoryFact,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All facts of an attribution, newest first.
    fn list_facts(
        &self,
        attribution: &Attribution,
    ) -> impl std::future::Future<Output = Result<Vec<MemoryFact>, RepositoryError>> + Send;
}
