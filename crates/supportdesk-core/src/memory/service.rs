//! Memory service: sessions, recall, history, and background augmentation.

use std::cmp::Ordering;

use chrono::Utc;
use tracing::{debug, info, warn};

use supportdesk_types::config::MemorySettings;
use supportdesk_types::error::RepositoryError;
use supportdesk_types::memory::{
    Attribution, ConversationMessage, ConversationRole, MemorySession, RecalledMemory,
};

use crate::llm::box_provider::BoxLlmProvider;
use crate::memory::extractor::MemoryExtractor;
use crate::memory::relevance;
use crate::memory::store::MemoryRepository;

/// Conversational memory over a [`MemoryRepository`].
pub struct MemoryService<M: MemoryRepository> {
    repo: M,
    settings: MemorySettings,
}

impl<M: MemoryRepository> MemoryService<M> {
    pub fn new(repo: M, settings: MemorySettings) -> Self {
        Self { repo, settings }
    }

    pub fn repo(&self) -> &M {
        &self.repo
    }

    pub fn settings(&self) -> &MemorySettings {
        &self.settings
    }

    /// Attribution of `user_id` to this application.
    pub fn attribution(&self, user_id: &str) -> Attribution {
        Attribution::new(user_id, &self.settings.process_id)
    }

    /// The session a turn should be recorded in.
    ///
    /// An explicitly requested id becomes the active session, unless another
    /// entity already owns it; then a fresh session is started instead.
    /// Without a requested id the active session is reused while it is
    /// fresh, and a new one is started once it has timed out.
    pub async fn resolve_session(
        &self,
        attribution: &Attribution,
        requested: Option<&str>,
    ) -> Result<String, RepositoryError> {
        let now = Utc::now();

        if let Some(id) = requested.filter(|id| !id.trim().is_empty()) {
            match self.repo.find_session(id).await? {
                Some(existing) if !existing.belongs_to(attribution) => {
                    warn!(
                        entity_id = %attribution.entity_id,
                        session_id = %id,
                        "Requested session belongs to another entity; starting a new one"
                    );
                    return self.new_session(attribution).await;
                }
                _ => {
                    self.repo
                        .upsert_session(&MemorySession::with_id(id, attribution, now))
                        .await?;
                    return Ok(id.to_string());
                }
            }
        }

        if let Some(session) = self.repo.active_session(attribution).await? {
            if session.is_fresh(now, self.settings.session_timeout_minutes) {
                return Ok(session.id);
            }
            debug!(session_id = %session.id, "Session timed out");
        }

        self.new_session(attribution).await
    }

    /// End all open sessions of the entity and start a fresh one.
    pub async fn new_session(&self, attribution: &Attribution) -> Result<String, RepositoryError> {
        let now = Utc::now();
        let ended = self.repo.end_sessions(attribution, now).await?;
        let session = MemorySession::start(attribution, now);
        self.repo.upsert_session(&session).await?;
        info!(
            entity_id = %attribution.entity_id,
            session_id = %session.id,
            ended,
            "New memory session started"
        );
        Ok(session.id)
    }

    /// Facts about the entity relevant to `query`, best first.
    pub async fn recall(
        &self,
        attribution: &Attribution,
        query: &str,
        limit: usize,
        threshold: f64,
    ) -> Result<Vec<RecalledMemory>, RepositoryError> {
        let facts = self.repo.list_facts(attribution).await?;

        let mut recalled: Vec<RecalledMemory> = facts
            .into_iter()
            .map(|fact| {
                let similarity = relevance::similarity(query, &fact.content);
                RecalledMemory { fact, similarity }
            })
            .filter(|m| m.similarity >= threshold)
            .collect();

        recalled.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.fact.created_at.cmp(&a.fact.created_at))
        });
        recalled.truncate(limit);

        debug!(
            entity_id = %attribution.entity_id,
            recalled = recalled.len(),
            "Memory recall"
        );
        Ok(recalled)
    }

    /// Recall with the configured limit and threshold.
    pub async fn recall_for_chat(
        &self,
        attribution: &Attribution,
        query: &str,
    ) -> Result<Vec<RecalledMemory>, RepositoryError> {
        self.recall(
            attribution,
            query,
            self.settings.recall_facts_limit,
            self.settings.recall_relevance_threshold,
        )
        .await
    }

    /// Recent messages the entity wrote in a session, oldest first.
    pub async fn history(
        &self,
        attribution: &Attribution,
        session_id: &str,
    ) -> Result<Vec<ConversationMessage>, RepositoryError> {
        self.repo
            .recent_messages(attribution, session_id, self.settings.history_messages)
            .await
    }

    /// Persist a user/assistant exchange and mark the session active.
    pub async fn record_exchange(
        &self,
        attribution: &Attribution,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<(), RepositoryError> {
        self.repo
            .upsert_session(&MemorySession::with_id(session_id, attribution, Utc::now()))
            .await?;
        self.repo
            .save_message(&ConversationMessage::new(
                attribution,
                session_id,
                ConversationRole::User,
                user_text,
            ))
            .await?;
        self.repo
            .save_message(&ConversationMessage::new(
                attribution,
                session_id,
                ConversationRole::Assistant,
                assistant_text,
            ))
            .await
    }

    /// Extract long-term facts from an exchange and store them.
    ///
    /// Returns the number of facts saved. Provider failures are logged and
    /// count as zero.
    pub async fn augment(
        &self,
        provider: &BoxLlmProvider,
        attribution: &Attribution,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<usize, RepositoryError> {
        let facts = match MemoryExtractor::extract(
            provider,
            attribution,
            session_id,
            user_text,
            assistant_text,
        )
        .await
        {
            Ok(facts) => facts,
            Err(e) => {
                warn!(error = %e, session_id = %session_id, "Memory augmentation failed");
                return Ok(0);
            }
        };

        for fact in &facts {
            self.repo.save_fact(fact).await?;
        }
        if !facts.is_empty() {
            info!(
                entity_id = %attribution.entity_id,
                session_id = %session_id,
                facts = facts.len(),
                "Memory augmented"
            );
        }
        Ok(facts.len())
    }
}
