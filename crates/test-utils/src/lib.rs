use anyhow::Result;
use async_trait::async_trait;
use ragwright::errors::LlmError;
use ragwright::ingest::ledger::{LedgerTables, StatusLedger};
use ragwright::providers::ai::AiProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use turso::Database;

// --- Test Setup ---

/// A helper struct to manage database creation for each test.
pub struct TestSetup {
    pub db: Database,
    pub ledger: StatusLedger,
}

impl TestSetup {
    /// Creates a new, isolated in-memory database and initializes the
    /// ledger and content-store schema with the default table names.
    pub async fn new() -> Result<Self> {
        let db = turso::Builder::new_local(":memory:").build().await?;
        let ledger = StatusLedger::new(db.clone(), LedgerTables::default());
        ledger.ensure_tables().await?;

        Ok(Self { db, ledger })
    }
}

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        Err(LlmError::Api(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}
