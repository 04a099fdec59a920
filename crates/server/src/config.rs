//! # Application Configuration
//!
//! This module defines the configuration structure for the `ragwright-server`
//! and provides the logic for loading it from a `config.yml` file and
//! environment variables. This approach allows for a structured, flexible,
//! and maintainable configuration setup.

use config::{
    Config as ConfigBuilder, Environment, File, FileFormat, Value as ConfigValue,
    ValueKind as ConfigValueKind,
};
use ragwright::constants::{
    DEFAULT_BATCH_LOG_TABLE, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_STATUS_TABLE, DEFAULT_POSTS_TABLE,
};
use ragwright::generation::types::Stage;
use ragwright::prompts::{content, research};
use ragwright::types::ProviderConfig;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file. Loaded from `DB_URL` env var.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The external news source the ingestion pipeline pulls from.
    pub source: SourceConfig,
    /// Path to the JSON document holding style examples for flair edits.
    #[serde(default)]
    pub style_examples_path: Option<String>,
    /// Table names for the content store and the status ledger.
    #[serde(default)]
    pub tables: TablesConfig,
    /// A map of named, reusable AI provider configurations.
    pub providers: HashMap<String, ProviderConfig>,
    /// Which provider from the `providers` map drives the generation stages.
    pub generation: GenerationConfig,
    /// A map of tasks, one per generation stage, each carrying its prompts.
    pub tasks: HashMap<String, TaskConfig>,
}

fn default_port() -> u16 {
    9090
}
fn default_db_url() -> String {
    "db/ragwright.db".to_string()
}

/// Configuration for the paginated news source.
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// The source name `POST /ingest` requests must address.
    pub name: String,
    /// The posts endpoint, queried with a `page` parameter.
    pub api_url: String,
    /// Path to the session cookie file.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    /// Pages per ingestion batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_cookie_path() -> String {
    ".session-cookie".to_string()
}
fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

/// Table names used by the ledger and the content store.
#[derive(Debug, Deserialize, Clone)]
pub struct TablesConfig {
    #[serde(default = "default_posts_table")]
    pub posts: String,
    #[serde(default = "default_batch_log_table")]
    pub batch_log: String,
    #[serde(default = "default_page_status_table")]
    pub page_status: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            posts: default_posts_table(),
            batch_log: default_batch_log_table(),
            page_status: default_page_status_table(),
        }
    }
}

fn default_posts_table() -> String {
    DEFAULT_POSTS_TABLE.to_string()
}
fn default_batch_log_table() -> String {
    DEFAULT_BATCH_LOG_TABLE.to_string()
}
fn default_page_status_table() -> String {
    DEFAULT_PAGE_STATUS_TABLE.to_string()
}

/// Selects the AI provider for the generation stage pipeline.
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    /// The key of the provider to use from the `providers` map.
    pub provider: String,
}

/// Defines the prompts for a specific generation stage.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TaskConfig {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

/// Constructs a `config::Value` map of the default, hardcoded stage prompts
/// from the library. This serves as the base layer of configuration.
fn build_default_tasks() -> HashMap<String, ConfigValue> {
    let tasks = [
        (
            Stage::ResearchQuestions,
            research::RESEARCH_QUESTIONS_SYSTEM_PROMPT,
            research::RESEARCH_QUESTIONS_MESSAGE_PROMPT,
        ),
        (
            Stage::Headlines,
            content::HEADLINES_SYSTEM_PROMPT,
            content::HEADLINES_MESSAGE_PROMPT,
        ),
        (
            Stage::Draft,
            content::DRAFT_SYSTEM_PROMPT,
            content::DRAFT_MESSAGE_PROMPT,
        ),
        (
            Stage::TopicSentences,
            content::TOPIC_SENTENCES_SYSTEM_PROMPT,
            content::TOPIC_SENTENCES_MESSAGE_PROMPT,
        ),
        (
            Stage::FullContent,
            content::FULL_CONTENT_SYSTEM_PROMPT,
            content::FULL_CONTENT_MESSAGE_PROMPT,
        ),
        (
            Stage::EditContent,
            content::EDIT_CONTENT_SYSTEM_PROMPT,
            content::EDIT_CONTENT_MESSAGE_PROMPT,
        ),
    ];

    tasks
        .into_iter()
        .map(|(stage, sys, user)| {
            let mut table = HashMap::new();
            table.insert("system_prompt".to_string(), ConfigValue::from(sys));
            table.insert("user_prompt".to_string(), ConfigValue::from(user));
            (
                stage.name().to_string(),
                ConfigValue::new(None, ConfigValueKind::Table(table)),
            )
        })
        .collect()
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// This function reads the configuration from a file. It also merges in
/// environment variables, allowing for overrides and substitution in the
/// YAML file.
/// - Top-level keys like `port` and `db_url` are overridden by `PORT` and `DB_URL`.
/// - Nested keys are overridden by `RAGWRIGHT_...` variables
///   (e.g., `RAGWRIGHT_SOURCE__API_URL`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults from the library.
        .set_default("tasks", build_default_tasks())?;

    // Layer 2: Main config file.
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let base_path = env!("CARGO_MANIFEST_DIR");
        format!("{base_path}/config.yml")
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists."
        ))
    })?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("RAGWRIGHT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    // Deserialize the fully resolved configuration into our `AppConfig` struct.
    let config: AppConfig = settings.try_deserialize()?;
    info!(
        source = %config.source.name,
        providers = config.providers.len(),
        "Configuration loaded"
    );

    Ok(config)
}
