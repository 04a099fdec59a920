//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. The `AppState` holds all shared
//! resources, such as the configuration, the storage provider, and the
//! ingestion and generation clients, making them accessible to all request
//! handlers.

use crate::config::AppConfig;
use ragwright::{
    generation::{types::Stage, StageClient, StyleBank},
    ingest::{CookieFile, LedgerTables, NewsIngestor, PageFetcher, StatusLedger},
    prompts::{PromptLibrary, StagePrompts},
    providers::{ai::AiProvider, db::sqlite::SqliteProvider, factory::create_provider},
};
use std::{collections::HashMap, sync::Arc};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The primary database provider for the content store and the ledger.
    pub sqlite_provider: Arc<SqliteProvider>,
    /// The client driving the six content-generation stages.
    pub stage_client: Arc<StageClient>,
    /// The orchestrator for batched, resumable news ingestion.
    pub ingestor: Arc<NewsIngestor>,
}

/// Builds the shared application state from the configuration.
///
/// This instantiates an AI provider client for each entry in the
/// `providers` section, resolves the stage prompt library from the `tasks`
/// section, sets up the SQLite connection, and wires the ingestion
/// pipeline against the configured source.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    // Create a map of AI provider instances from the configuration.
    let mut ai_providers: HashMap<String, Box<dyn AiProvider>> = HashMap::new();
    for (name, provider_config) in &config.providers {
        let provider = create_provider(provider_config)
            .map_err(|e| anyhow::anyhow!("Failed to build provider '{name}': {e}"))?;
        ai_providers.insert(name.clone(), provider);
    }

    let generation_provider = ai_providers
        .get(&config.generation.provider)
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Generation provider '{}' not found in the providers map",
                config.generation.provider
            )
        })?
        .clone();

    // Resolve the stage prompt library. The config loading fills every task
    // with the library defaults, so a missing prompt here indicates a
    // malformed override.
    let mut prompts = PromptLibrary::default();
    for (name, task) in &config.tasks {
        let Some(stage) = Stage::from_name(name) else {
            anyhow::bail!("Task '{name}' does not name a generation stage");
        };
        let system = task.system_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Task '{name}' is missing required 'system_prompt' field")
        })?;
        let message = task.user_prompt.clone().ok_or_else(|| {
            anyhow::anyhow!("Task '{name}' is missing required 'user_prompt' field")
        })?;
        prompts.set(stage, StagePrompts { system, message });
    }

    let mut stage_client = StageClient::new(generation_provider, prompts);
    if let Some(path) = &config.style_examples_path {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read style examples from '{path}': {e}"))?;
        let styles: StyleBank = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Malformed style examples in '{path}': {e}"))?;
        stage_client = stage_client.with_styles(styles);
    }

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");

    let tables = LedgerTables {
        posts: config.tables.posts.clone(),
        batch_log: config.tables.batch_log.clone(),
        page_status: config.tables.page_status.clone(),
    };
    let ledger = StatusLedger::new(sqlite_provider.db.clone(), tables);
    // Ensure the ledger and content-store schema is up-to-date on startup.
    ledger.ensure_tables().await?;

    let fetcher = PageFetcher::new(
        config.source.api_url.clone(),
        CookieFile::new(config.source.cookie_path.clone()),
    )?;
    let ingestor = NewsIngestor::new(fetcher, ledger, config.source.name.clone())
        .with_batch_size(config.source.batch_size);

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
        stage_client: Arc::new(stage_client),
        ingestor: Arc::new(ingestor),
    })
}
