//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the
//! `ragwright-server` integration tests. `TestApp` spawns a real server on
//! a random port, backed by an isolated in-memory database, a mock AI
//! provider, and a caller-supplied source endpoint (usually a
//! `wiremock::MockServer`).

#![allow(unused)]

use anyhow::Result;
use ragwright::{
    generation::{StageClient, StyleBank},
    ingest::{CookieFile, LedgerTables, NewsIngestor, PageFetcher, StatusLedger},
    prompts::PromptLibrary,
    providers::db::sqlite::SqliteProvider,
    types::ProviderConfig,
};
use ragwright_server::{
    config::{AppConfig, GenerationConfig, SourceConfig, TablesConfig},
    router::create_router,
    state::AppState,
};
use ragwright_test_utils::MockAiProvider;
use reqwest::Client;
use std::{
    collections::{BTreeMap, HashMap},
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};
use tempfile::NamedTempFile;
use tokio::{net::TcpListener, task::JoinHandle};

/// The source name the test configuration registers for ingestion.
pub const TEST_SOURCE: &str = "newswire";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub app_state: AppState,
    pub ai_provider: MockAiProvider,
    _cookie_file: NamedTempFile,
    _server_handle: JoinHandle<()>,
}

impl TestApp {
    /// Spawns the application server against `source_url` and returns a
    /// `TestApp` instance. The generation stages run against a
    /// `MockAiProvider` so tests can program stage responses keyed by a
    /// system-prompt substring.
    pub async fn spawn(source_url: &str) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let cookie_file = NamedTempFile::new()?;
        std::fs::write(cookie_file.path(), "session=test")?;

        let config = AppConfig {
            port: 0,
            db_url: ":memory:".to_string(),
            source: SourceConfig {
                name: TEST_SOURCE.to_string(),
                api_url: format!("{source_url}/posts"),
                cookie_path: cookie_file.path().to_str().unwrap().to_string(),
                batch_size: 2,
            },
            style_examples_path: None,
            tables: TablesConfig::default(),
            providers: HashMap::<String, ProviderConfig>::new(),
            generation: GenerationConfig {
                provider: "mock".to_string(),
            },
            tasks: HashMap::new(),
        };

        let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
        let ledger = StatusLedger::new(sqlite_provider.db.clone(), LedgerTables::default());
        ledger.ensure_tables().await?;

        let fetcher = PageFetcher::new(
            config.source.api_url.clone(),
            CookieFile::new(config.source.cookie_path.clone()),
        )?
        .with_retry_policy(2, Duration::from_millis(5));
        let ingestor = NewsIngestor::new(fetcher, ledger, TEST_SOURCE)
            .with_batch_size(config.source.batch_size);

        let ai_provider = MockAiProvider::new();
        let stage_client = StageClient::new(Box::new(ai_provider.clone()), PromptLibrary::default())
            .with_styles(test_style_bank());

        let app_state = AppState {
            config: Arc::new(config),
            sqlite_provider: Arc::new(sqlite_provider),
            stage_client: Arc::new(stage_client),
            ingestor: Arc::new(ingestor),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let state_for_server = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = create_router(state_for_server);
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("[TestApp] Server error: {e}");
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(Self {
            address,
            client: Client::new(),
            app_state,
            ai_provider,
            _cookie_file: cookie_file,
            _server_handle: server_handle,
        })
    }
}

fn test_style_bank() -> StyleBank {
    StyleBank {
        categories: BTreeMap::from([
            (
                "openers".to_string(),
                vec![
                    "Start in the middle of the action.".to_string(),
                    "Lead with the surprising number.".to_string(),
                    "Open on a person, not a policy.".to_string(),
                ],
            ),
            (
                "closers".to_string(),
                vec!["End where the reader can act.".to_string()],
            ),
        ]),
    }
}
