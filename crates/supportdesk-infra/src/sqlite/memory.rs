//! SQLite memory repository implementation.
//!
//! Implements `MemoryRepository` from `supportdesk-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the single
//! writer connection.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use supportdesk_core::memory::store::MemoryRepository;
use supportdesk_types::error::RepositoryError;
use supportdesk_types::memory::{
    Attribution, ConversationMessage, ConversationRole, MemoryCategory, MemoryFact, MemorySession,
};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MemoryRepository`.
#[derive(Clone)]
pub struct SqliteMemoryRepository {
    pool: DatabasePool,
}

impl SqliteMemoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    id: String,
    entity_id: String,
    process_id: String,
    started_at: String,
    last_active_at: String,
    ended_at: Option<String>,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            entity_id: row.try_get("entity_id")?,
            process_id: row.try_get("process_id")?,
            started_at: row.try_get("started_at")?,
            last_active_at: row.try_get("last_active_at")?,
            ended_at: row.try_get("ended_at")?,
        })
    }

    fn into_session(self) -> Result<MemorySession, RepositoryError> {
        Ok(MemorySession {
            id: self.id,
            entity_id: self.entity_id,
            process_id: self.process_id,
            started_at: parse_datetime(&self.started_at)?,
            last_active_at: parse_datetime(&self.last_active_at)?,
            ended_at: self.ended_at.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

struct MessageRow {
    id: String,
    session_id: String,
    entity_id: String,
    process_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            entity_id: row.try_get("entity_id")?,
            process_id: row.try_get("process_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ConversationMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let role: ConversationRole = self.role.parse().map_err(RepositoryError::Query)?;

        Ok(ConversationMessage {
            id,
            session_id: self.session_id,
            entity_id: self.entity_id,
            process_id: self.process_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

struct FactRow {
    id: String,
    entity_id: String,
    process_id: String,
    session_id: String,
    content: String,
    category: String,
    importance: i64,
    created_at: String,
}

impl FactRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            entity_id: row.try_get("entity_id")?,
            process_id: row.try_get("process_id")?,
            session_id: row.try_get("session_id")?,
            content: row.try_get("content")?,
            category: row.try_get("category")?,
            importance: row.try_get("importance")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_fact(self) -> Result<MemoryFact, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid fact id: {e}")))?;
        let category: MemoryCategory = self.category.parse().map_err(RepositoryError::Query)?;

        Ok(MemoryFact {
            id,
            entity_id: self.entity_id,
            process_id: self.process_id,
            session_id: self.session_id,
            content: self.content,
            category,
            importance: self.importance.clamp(1, 5) as u8,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width so lexical order matches chronological order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// MemoryRepository implementation
// ---------------------------------------------------------------------------

impl MemoryRepository for SqliteMemoryRepository {
    async fn active_session(
        &self,
        attribution: &Attribution,
    ) -> Result<Option<MemorySession>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM memory_sessions
               WHERE entity_id = ? AND process_id = ? AND ended_at IS NULL
               ORDER BY last_active_at DESC
               LIMIT 1"#,
        )
        .bind(&attribution.entity_id)
        .bind(&attribution.process_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_err)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_err)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn find_session(&self, id: &str) -> Result<Option<MemorySession>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM memory_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let session_row = SessionRow::from_row(&row).map_err(query_err)?;
                Ok(Some(session_row.into_session()?))
            }
            None => Ok(None),
        }
    }

    async fn upsert_session(&self, session: &MemorySession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO memory_sessions (id, entity_id, process_id, started_at, last_active_at, ended_at)
               VALUES (?, ?, ?, ?, ?, NULL)
               ON CONFLICT(id) DO UPDATE SET last_active_at = excluded.last_active_at, ended_at = NULL
               WHERE memory_sessions.entity_id = excluded.entity_id
                 AND memory_sessions.process_id = excluded.process_id"#,
        )
        .bind(&session.id)
        .bind(&session.entity_id)
        .bind(&session.process_id)
        .bind(format_datetime(&session.started_at))
        .bind(format_datetime(&session.last_active_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(())
    }

    async fn end_sessions(
        &self,
        attribution: &Attribution,
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE memory_sessions SET ended_at = ?
               WHERE entity_id = ? AND process_id = ? AND ended_at IS NULL"#,
        )
        .bind(format_datetime(&at))
        .bind(&attribution.entity_id)
        .bind(&attribution.process_id)
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(result.rows_affected())
    }

    async fn save_message(&self, message: &ConversationMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO memory_messages (id, session_id, entity_id, process_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(&message.session_id)
        .bind(&message.entity_id)
        .bind(&message.process_id)
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(())
    }

    async fn recent_messages(
        &self,
        attribution: &Attribution,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        // Newest `limit` rows, flipped back to chronological order.
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT * FROM memory_messages
                   WHERE session_id = ? AND entity_id = ? AND process_id = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               ) ORDER BY created_at ASC, id ASC"#,
        )
        .bind(session_id)
        .bind(&attribution.entity_id)
        .bind(&attribution.process_id)
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row = MessageRow::from_row(row).map_err(query_err)?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn save_fact(&self, fact: &MemoryFact) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO memory_facts (id, entity_id, process_id, session_id, content, category, importance, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(entity_id, process_id, content) DO NOTHING"#,
        )
        .bind(fact.id.to_string())
        .bind(&fact.entity_id)
        .bind(&fact.process_id)
        .bind(&fact.session_id)
        .bind(&fact.content)
        .bind(fact.category.to_string())
        .bind(fact.importance as i64)
        .bind(format_datetime(&fact.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        Ok(())
    }

    async fn list_facts(&self, attribution: &Attribution) -> Result<Vec<MemoryFact>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM memory_facts
               WHERE entity_id = ? AND process_id = ?
               ORDER BY created_at DESC"#,
        )
        .bind(&attribution.entity_id)
        .bind(&attribution.process_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut facts = Vec::with_capacity(rows.len());
        for row in &rows {
            let fact_row = FactRow::from_row(row).map_err(query_err)?;
            facts.push(fact_row.into_fact()?);
        }

        Ok(facts)
    }
}
