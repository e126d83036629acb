//! In-memory doubles for the core ports, used by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use supportdesk_types::error::{RepositoryError, TicketError};
use supportdesk_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, StopReason, ToolCall, Usage,
};
use supportdesk_types::memory::{Attribution, ConversationMessage, MemoryFact, MemorySession};
use supportdesk_types::ticket::Ticket;

use crate::llm::provider::LlmProvider;
use crate::memory::store::MemoryRepository;
use crate::ticket::store::TicketStore;

/// Provider that replays scripted responses in order and records requests.
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<CompletionResponse, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(Self::text_response(t))).collect())
    }

    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            id: "resp_text".to_string(),
            content: text.to_string(),
            tool_calls: Vec::new(),
            model: "n/a".to_string(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        }
    }

    pub fn tool_response(calls: Vec<ToolCall>) -> CompletionResponse {
        CompletionResponse {
            id: "resp_tools".to_string(),
            content: String::new(),
            tool_calls: calls,
            model: "n/a".to_string(),
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        }
    }

    /// Shared handle to every request received so far.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "n/a"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }
}

/// Ticket store backed by a vector.
pub struct InMemoryTicketStore {
    tickets: Mutex<Vec<Ticket>>,
    exists: AtomicBool,
    fail_writes: AtomicBool,
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            exists: AtomicBool::new(true),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl InMemoryTicketStore {
    /// A store whose backing storage has not been created.
    pub fn missing() -> Self {
        let store = Self::default();
        store.exists.store(false, Ordering::SeqCst);
        store
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl TicketStore for InMemoryTicketStore {
    async fn init(&self) -> Result<(), TicketError> {
        self.exists.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn append(&self, ticket: &Ticket) -> Result<(), TicketError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TicketError::Io(std::io::Error::other("disk full")));
        }
        self.exists.store(true, Ordering::SeqCst);
        self.tickets.lock().unwrap().push(ticket.clone());
        Ok(())
    }

    async fn load_if_present(&self) -> Result<Option<Vec<Ticket>>, TicketError> {
        if !self.exists.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(self.tickets.lock().unwrap().clone()))
    }
}

/// Memory repository backed by vectors.
#[derive(Default)]
pub struct InMemoryMemoryRepository {
    sessions: Mutex<Vec<MemorySession>>,
    messages: Mutex<Vec<ConversationMessage>>,
    facts: Mutex<Vec<MemoryFact>>,
}

impl InMemoryMemoryRepository {
    pub fn session(&self, id: &str) -> Option<MemorySession> {
        self.sessions.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }
}

fn owned_by(entity_id: &str, process_id: &str, attribution: &Attribution) -> bool {
    entity_id == attribution.entity_id && process_id == attribution.process_id
}

impl MemoryRepository for InMemoryMemoryRepository {
    async fn active_session(
        &self,
        attribution: &Attribution,
    ) -> Result<Option<MemorySession>, RepositoryError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.ended_at.is_none() && owned_by(&s.entity_id, &s.process_id, attribution))
            .max_by_key(|s| s.last_active_at)
            .cloned())
    }

    async fn find_session(&self, id: &str) -> Result<Option<MemorySession>, RepositoryError> {
        Ok(self.session(id))
    }

    async fn upsert_session(&self, session: &MemorySession) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session.id) {
            Some(existing) => {
                if existing.entity_id != session.entity_id || existing.process_id != session.process_id {
                    return Ok(());
                }
                existing.last_active_at = session.last_active_at;
                existing.ended_at = None;
            }
            None => sessions.push(session.clone()),
        }
        Ok(())
    }

    async fn end_sessions(
        &self,
        attribution: &Attribution,
        at: DateTime<Utc>,
    ) -> Result<u64, RepositoryError> {
        let mut ended = 0;
        for session in self.sessions.lock().unwrap().iter_mut() {
            if session.ended_at.is_none() && owned_by(&session.entity_id, &session.process_id, attribution) {
                session.ended_at = Some(at);
                ended += 1;
            }
        }
        Ok(ended)
    }

    async fn save_message(&self, message: &ConversationMessage) -> Result<(), RepositoryError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        attribution: &Attribution,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        let messages: Vec<ConversationMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.session_id == session_id && owned_by(&m.entity_id, &m.process_id, attribution))
            .cloned()
            .collect();
        let skip = messages.len().saturating_sub(limit.max(0) as usize);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn save_fact(&self, fact: &MemoryFact) -> Result<(), RepositoryError> {
        let mut facts = self.facts.lock().unwrap();
        let duplicate = facts.iter().any(|f| {
            f.entity_id == fact.entity_id && f.process_id == fact.process_id && f.content == fact.content
        });
        if !duplicate {
            facts.push(fact.clone());
        }
        Ok(())
    }

    async fn list_facts(&self, attribution: &Attribution) -> Result<Vec<MemoryFact>, RepositoryError> {
        let mut facts: Vec<MemoryFact> = self
            .facts
            .lock()
            .unwrap()
            .iter()
            .filter(|f| owned_by(&f.entity_id, &f.process_id, attribution))
            .cloned()
            .collect();
        facts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(facts)
    }
}
