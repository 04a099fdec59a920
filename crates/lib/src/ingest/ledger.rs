//! # Status Ledger
//!
//! Persists per-page and per-batch processing status so that interrupted
//! ingestion runs can be resumed. Page rows are upserted by
//! `(batch_number, page_number)`; batch rows are append-only.

use crate::constants::{DEFAULT_BATCH_LOG_TABLE, DEFAULT_PAGE_STATUS_TABLE, DEFAULT_POSTS_TABLE};
use crate::providers::db::sqlite::sql;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use turso::{params, Connection, Database};

/// Custom error types for ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database connection failed: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
}

/// Processing state of one fetched page.
///
/// `Started` marks a page that has entered processing; the other variants
/// are terminal until an operator re-runs the incomplete pages, at which
/// point the page re-enters `Started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    Started,
    Done,
    NoPosts,
    Error(String),
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageStatus::Started => write!(f, "started"),
            PageStatus::Done => write!(f, "done"),
            PageStatus::NoPosts => write!(f, "no posts"),
            PageStatus::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Table names used by the ledger and the content store.
///
/// The names are configuration, not hardcoded: deployments point different
/// sources at different tables.
#[derive(Debug, Clone)]
pub struct LedgerTables {
    pub posts: String,
    pub batch_log: String,
    pub page_status: String,
}

impl Default for LedgerTables {
    fn default() -> Self {
        Self {
            posts: DEFAULT_POSTS_TABLE.to_string(),
            batch_log: DEFAULT_BATCH_LOG_TABLE.to_string(),
            page_status: DEFAULT_PAGE_STATUS_TABLE.to_string(),
        }
    }
}

/// Persistent record of batch and page processing status.
///
/// Cloning shares the underlying database handle.
#[derive(Clone)]
pub struct StatusLedger {
    db: Database,
    tables: LedgerTables,
}

impl StatusLedger {
    pub fn new(db: Database, tables: LedgerTables) -> Self {
        Self { db, tables }
    }

    pub fn tables(&self) -> &LedgerTables {
        &self.tables
    }

    pub fn connect(&self) -> Result<Connection, LedgerError> {
        self.db
            .connect()
            .map_err(|e| LedgerError::Connection(e.to_string()))
    }

    /// Creates the ledger and content-store tables if they do not exist.
    /// Idempotent, safe to call on every run.
    pub async fn ensure_tables(&self) -> Result<(), LedgerError> {
        let conn = self.connect()?;
        conn.execute(&sql::posts_table_ddl(&self.tables.posts), ())
            .await?;
        conn.execute(&sql::batch_log_ddl(&self.tables.batch_log), ())
            .await?;
        conn.execute(&sql::page_status_ddl(&self.tables.page_status), ())
            .await?;
        Ok(())
    }

    /// Records that a batch has begun.
    ///
    /// This is an append: re-running ingestion for the same batch number
    /// produces one "started" row per run, and the batch's terminal state
    /// is inferred from the aggregate of its page rows.
    pub async fn log_batch_start(&self, batch_number: u32) -> Result<(), LedgerError> {
        let conn = self.connect()?;
        let stmt = format!(
            "INSERT INTO {} (batch_number, status) VALUES (?, ?)",
            self.tables.batch_log
        );
        conn.execute(&stmt, params![batch_number as i64, "started"])
            .await?;
        Ok(())
    }

    /// Upserts the status for one page, keyed by
    /// `(batch_number, page_number)`. Last write wins.
    pub async fn log_page_status(
        &self,
        batch_number: u32,
        page_number: u32,
        status: &PageStatus,
    ) -> Result<(), LedgerError> {
        let conn = self.connect()?;
        let stmt = format!(
            "INSERT INTO {} (batch_number, page_number, status, updated_at)
             VALUES (?, ?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(batch_number, page_number) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at",
            self.tables.page_status
        );
        conn.execute(
            &stmt,
            params![batch_number as i64, page_number as i64, status.to_string()],
        )
        .await?;
        Ok(())
    }

    /// Returns every page whose latest status is not "done", grouped by
    /// batch number in ascending page order.
    pub async fn find_incomplete_pages(&self) -> Result<BTreeMap<u32, Vec<u32>>, LedgerError> {
        let conn = self.connect()?;
        let stmt = format!(
            "SELECT batch_number, page_number FROM {}
             WHERE status != 'done'
             ORDER BY batch_number, page_number",
            self.tables.page_status
        );
        let mut rows = conn.query(&stmt, ()).await?;

        let mut incomplete: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        while let Some(row) = rows.next().await? {
            let batch_number: i64 = row.get(0)?;
            let page_number: i64 = row.get(1)?;
            incomplete
                .entry(batch_number as u32)
                .or_default()
                .push(page_number as u32);
        }
        Ok(incomplete)
    }
}
