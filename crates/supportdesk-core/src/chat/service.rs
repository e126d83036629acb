//! Support chat orchestration.
//!
//! One turn: resolve the session, recall memories and history, ask the model
//! with the ticket tools available, run any tool calls and ask again for the
//! final answer, then record the exchange and augment memory in the background.

use std::sync::Arc;

use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use supportdesk_types::chat::{ChatRequest, ChatResponse};
use supportdesk_types::error::ChatError;
use supportdesk_types::llm::{CompletionRequest, Message, ToolChoice};
use supportdesk_types::memory::ConversationRole;

use crate::llm::box_provider::BoxLlmProvider;
use crate::memory::service::MemoryService;
use crate::memory::store::MemoryRepository;
use crate::prompt::build_system_prompt;
use crate::ticket::service::TicketService;
use crate::ticket::store::TicketStore;
use crate::tools::{CREATE_TICKET_TOOL, ToolDispatcher, tool_definitions};

/// Orchestrates a support conversation turn.
///
/// Generic over `TicketStore` and `MemoryRepository` so supportdesk-core
/// never depends on supportdesk-infra.
pub struct SupportChatService<T: TicketStore, M: MemoryRepository> {
    provider: Arc<BoxLlmProvider>,
    tickets: Arc<TicketService<T>>,
    memory: Arc<MemoryService<M>>,
    tools: ToolDispatcher<T>,
    max_tokens: Option<u32>,
    background: TaskTracker,
}

impl<T: TicketStore, M: MemoryRepository + 'static> SupportChatService<T, M> {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        tickets: Arc<TicketService<T>>,
        memory: Arc<MemoryService<M>>,
    ) -> Self {
        Self {
            provider,
            tools: ToolDispatcher::new(Arc::clone(&tickets)),
            tickets,
            memory,
            max_tokens: None,
            background: TaskTracker::new(),
        }
    }

    /// Cap the completion length of chat turns.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn tickets(&self) -> &TicketService<T> {
        &self.tickets
    }

    pub fn memory(&self) -> &MemoryService<M> {
        &self.memory
    }

    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    /// Handle one user message.
    #[tracing::instrument(name = "chat_turn", skip(self, request), fields(user_id = %request.user_id()))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let user_id = request.user_id();
        let attribution = self.memory.attribution(user_id);
        let session_id = self
            .memory
            .resolve_session(&attribution, request.session_id())
            .await?;

        let recalled = match self.memory.recall_for_chat(&attribution, &request.message).await {
            Ok(recalled) => recalled,
            Err(e) => {
                warn!(error = %e, "Memory recall failed; continuing without memories");
                Vec::new()
            }
        };
        let history = match self.memory.history(&attribution, &session_id).await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Loading session history failed; continuing without it");
                Vec::new()
            }
        };
        debug!(
            session_id = %session_id,
            recalled = recalled.len(),
            history = history.len(),
            "Context assembled"
        );

        let system = build_system_prompt(&recalled);
        let mut messages: Vec<Message> = history
            .into_iter()
            .map(|m| match m.role {
                ConversationRole::User => Message::user(m.content),
                ConversationRole::Assistant => Message::assistant(m.content),
            })
            .collect();
        messages.push(Message::user(request.message.clone()));

        let first = self
            .provider
            .complete(
                &self
                    .completion_request(&system, messages.clone())
                    .with_tools(tool_definitions(), ToolChoice::Auto),
            )
            .await?;

        let mut ticket_id = None;
        let reply = if first.has_tool_calls() {
            messages.push(Message::assistant_with_tools(
                first.content.clone(),
                first.tool_calls.clone(),
            ));

            for call in &first.tool_calls {
                let execution = self
                    .tools
                    .execute(&call.name, user_id, &session_id, &call.arguments)
                    .await;
                if call.name == CREATE_TICKET_TOOL && execution.result.success {
                    ticket_id = execution.created_ticket_id.clone();
                }
                messages.push(Message::tool_result(&call.id, execution.result.to_json()));
            }

            let second = self
                .provider
                .complete(&self.completion_request(&system, messages))
                .await?;
            second.content
        } else {
            first.content
        };

        if let Err(e) = self
            .memory
            .record_exchange(&attribution, &session_id, &request.message, &reply)
            .await
        {
            warn!(error = %e, session_id = %session_id, "Failed to record exchange");
        }

        if self.memory.settings().augmentation {
            let memory = Arc::clone(&self.memory);
            let provider = Arc::clone(&self.provider);
            let session = session_id.clone();
            let user_text = request.message.clone();
            let assistant_text = reply.clone();
            self.background.spawn(async move {
                if let Err(e) = memory
                    .augment(&provider, &attribution, &session, &user_text, &assistant_text)
                    .await
                {
                    warn!(error = %e, session_id = %session, "Failed to store extracted memories");
                }
            });
        }

        info!(
            session_id = %session_id,
            ticket_created = ticket_id.is_some(),
            "Chat turn complete"
        );

        Ok(ChatResponse {
            response: reply,
            session_id,
            ticket_created: ticket_id.is_some(),
            ticket_id,
        })
    }

    /// Wait for in-flight background memory work, then stop accepting more.
    pub async fn shutdown(&self) {
        self.background.close();
        self.background.wait().await;
    }

    fn completion_request(&self, system: &str, messages: Vec<Message>) -> CompletionRequest {
        let mut request =
            CompletionRequest::new(self.provider.model(), Some(system.to_string()), messages);
        request.max_tokens = self.max_tokens;
        request
    }
}
