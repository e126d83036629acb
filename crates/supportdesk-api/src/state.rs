//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over store/repository traits, but AppState pins them
//! to the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use supportdesk_core::chat::service::SupportChatService;
use supportdesk_core::llm::box_provider::BoxLlmProvider;
use supportdesk_core::memory::service::MemoryService;
use supportdesk_core::ticket::service::TicketService;
use supportdesk_core::ticket::store::TicketStore;
use supportdesk_infra::config::{database_url, require_agent_credentials, tickets_path};
use supportdesk_infra::filesystem::ensure_data_dir;
use supportdesk_infra::llm::create_agent_provider;
use supportdesk_infra::sqlite::memory::SqliteMemoryRepository;
use supportdesk_infra::sqlite::pool::DatabasePool;
use supportdesk_infra::tickets::csv_store::CsvTicketStore;
use supportdesk_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteTicketService = TicketService<CsvTicketStore>;

pub type ConcreteMemoryService = MemoryService<SqliteMemoryRepository>;

pub type ConcreteChatService = SupportChatService<CsvTicketStore, SqliteMemoryRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Initialize the application state: storage, agent provider, chat service.
    ///
    /// Fails when the agent endpoint or access key is not configured.
    pub async fn init(config: AppConfig, data_dir: &Path) -> anyhow::Result<Self> {
        let credentials = require_agent_credentials(&config.agent)?;

        let tickets = open_tickets(&config, data_dir).await?;
        let memory = open_memory(&config, data_dir).await?;
        let provider = create_agent_provider(&credentials, &config.agent)?;

        Ok(Self::from_parts(provider, tickets, memory, config))
    }

    /// Wire already-built services. Used by `init` and by tests.
    pub fn from_parts(
        provider: BoxLlmProvider,
        tickets: ConcreteTicketService,
        memory: ConcreteMemoryService,
        config: AppConfig,
    ) -> Self {
        let chat_service = SupportChatService::new(
            Arc::new(provider),
            Arc::new(tickets),
            Arc::new(memory),
        )
        .with_max_tokens(config.agent.max_tokens);

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
        }
    }

    /// Directory the chat page is served from.
    pub fn web_dir(&self) -> PathBuf {
        self.config.server.web_dir.clone()
    }
}

/// Open the ticket CSV, creating it with its header when missing.
pub async fn open_tickets(config: &AppConfig, data_dir: &Path) -> anyhow::Result<ConcreteTicketService> {
    let path = tickets_path(config, data_dir);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_data_dir(parent).await?;
    }
    let store = CsvTicketStore::new(path);
    store.init().await?;
    Ok(TicketService::new(store))
}

/// Ticket service over the CSV without creating it; a missing file lists as empty.
pub fn ticket_reader(config: &AppConfig, data_dir: &Path) -> ConcreteTicketService {
    TicketService::new(CsvTicketStore::new(tickets_path(config, data_dir)))
}

/// Connect to the memory database and run migrations.
pub async fn open_memory(config: &AppConfig, data_dir: &Path) -> anyhow::Result<ConcreteMemoryService> {
    ensure_data_dir(data_dir).await?;
    let url = database_url(config, data_dir);
    let pool = DatabasePool::new(&url).await?;
    tracing::debug!(url = %url, "memory database ready");
    Ok(MemoryService::new(
        SqliteMemoryRepository::new(pool),
        config.memory.clone(),
    ))
}
