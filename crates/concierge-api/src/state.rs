//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Core services are generic over repository traits; AppState
//! pins them to the SQLite implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::warn;

use concierge_core::chat::service::ChatService;
use concierge_core::chat::session::ChatSession;
use concierge_core::inquiry::service::InquiryService;
use concierge_core::service::admin::AdminService;
use concierge_infra::config::{load_global_config, resolve_api_key};
use concierge_infra::data_dir::resolve_data_dir;
use concierge_infra::llm::create_provider;
use concierge_infra::sqlite::chat_log::SqliteChatLogRepository;
use concierge_infra::sqlite::inquiry::SqliteInquiryRepository;
use concierge_infra::sqlite::pool::{database_url, DatabasePool};
use concierge_types::config::ServerConfig;

use crate::sessions::SessionRegistry;

pub type ConcreteChatService = ChatService<SqliteChatLogRepository>;
pub type ConcreteChatSession = ChatSession<SqliteChatLogRepository>;
pub type ConcreteSessionRegistry = SessionRegistry<SqliteChatLogRepository>;
pub type ConcreteInquiryService = InquiryService<SqliteInquiryRepository>;
pub type ConcreteAdminService = AdminService<SqliteChatLogRepository, SqliteInquiryRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no model API key is configured; chat is then unavailable
    /// while inquiries and the admin read path keep working.
    pub chat_service: Option<Arc<ConcreteChatService>>,
    pub inquiry_service: Arc<ConcreteInquiryService>,
    pub admin_service: Arc<ConcreteAdminService>,
    /// Chat sessions that have been opened over HTTP and not yet closed.
    pub sessions: Arc<ConcreteSessionRegistry>,
    pub server: ServerConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;
        let chat_logs = SqliteChatLogRepository::new(db_pool.clone());
        let inquiries = SqliteInquiryRepository::new(db_pool);

        let chat_service = match create_provider(&config.provider, resolve_api_key()) {
            Ok(provider) => {
                let service = ChatService::new(
                    Arc::new(provider),
                    Arc::new(chat_logs.clone()),
                    &config.chat,
                )
                .context("invalid chat configuration: greeting and fallback texts must not be blank")?;
                Some(Arc::new(service))
            }
            Err(e) => {
                warn!(error = %e, "Chat disabled: no model API key configured");
                None
            }
        };
        let inquiry_service = InquiryService::new(inquiries.clone());
        let admin_service = AdminService::new(chat_logs, inquiries, config.admin.access_key.clone());

        Ok(Self {
            chat_service,
            inquiry_service: Arc::new(inquiry_service),
            admin_service: Arc::new(admin_service),
            sessions: Arc::new(SessionRegistry::new(config.server.max_live_sessions)),
            server: config.server,
            data_dir,
        })
    }

    /// The chat service, or an error explaining how to enable it.
    pub fn chat(&self) -> anyhow::Result<&Arc<ConcreteChatService>> {
        self.chat_service.as_ref().ok_or_else(|| {
            anyhow::anyhow!("no model API key found; set GEMINI_API_KEY (or API_KEY) in the environment")
        })
    }
}
