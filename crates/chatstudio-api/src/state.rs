//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/provider traits, but AppState pins
//! them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chatstudio_core::chat::turn::TurnController;
use chatstudio_core::llm::retry::RetryPolicy;
use chatstudio_core::service::store::StoreService;
use chatstudio_infra::config::{load_studio_config, resolve_data_dir};
use chatstudio_infra::llm::openai::OpenAiProviderFactory;
use chatstudio_infra::secret::EnvCredentialSource;
use chatstudio_infra::sqlite::chat::SqliteChatRepository;
use chatstudio_infra::sqlite::pool::DatabasePool;
use chatstudio_infra::sqlite::project::SqliteProjectRepository;
use chatstudio_types::config::StudioConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteStoreService = StoreService<SqliteProjectRepository, SqliteChatRepository>;

pub type ConcreteTurnController =
    TurnController<SqliteProjectRepository, SqliteChatRepository, OpenAiProviderFactory>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConcreteStoreService>,
    pub turns: Arc<ConcreteTurnController>,
    pub config: Arc<StudioConfig>,
    pub credentials: EnvCredentialSource,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    /// Serializes turns within this process so a turn's messages stay
    /// contiguous in the log.
    pub turn_gate: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    /// Initialize the application state: resolve data dir, connect to DB,
    /// load config, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::open_in(&data_dir).await?;
        let config = load_studio_config(&data_dir).await;

        Ok(Self::from_parts(data_dir, db_pool, config))
    }

    /// Wire services over an already-open pool.
    pub fn from_parts(data_dir: PathBuf, db_pool: DatabasePool, config: StudioConfig) -> Self {
        let store = Arc::new(StoreService::new(
            SqliteProjectRepository::new(db_pool.clone()),
            SqliteChatRepository::new(db_pool.clone()),
        ));

        let factory = OpenAiProviderFactory::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        );
        let turns = TurnController::new(store.clone(), factory)
            .with_retry(RetryPolicy::from_config(&config));

        Self {
            store,
            turns: Arc::new(turns),
            config: Arc::new(config),
            credentials: EnvCredentialSource::default(),
            data_dir,
            db_pool,
            turn_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// State over a fresh database in a leaked temp directory.
    #[cfg(test)]
    pub async fn for_tests(config: StudioConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        let db_pool = DatabasePool::open_in(&data_dir).await.unwrap();
        let mut state = Self::from_parts(data_dir, db_pool, config);
        // Tests never read the real OPENAI_API_KEY.
        state.credentials = EnvCredentialSource::new("CHATSTUDIO_TEST_UNSET_API_KEY");
        state
    }
}
