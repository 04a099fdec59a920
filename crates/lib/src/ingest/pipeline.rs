//! # Ingestion Orchestration
//!
//! Drives the fetch → extract → persist → log cycle per page within a
//! batch, isolating per-page failures so one bad page never aborts its
//! siblings, and re-deriving incomplete work from the status ledger for
//! resumable retries.

use super::batch::generate_batches;
use super::fetcher::{FetchError, PageFetcher};
use super::ledger::{LedgerError, PageStatus, StatusLedger};
use super::posts::{extract_posts, insert_posts, PostError};
use crate::constants::DEFAULT_BATCH_SIZE;
use thiserror::Error;
use tracing::{error, info};

/// Custom error types for the ingestion orchestrator.
///
/// These cover infrastructure failures that abort a run; per-page
/// processing failures are recorded in the ledger instead of raised.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Unsupported ingestion source: {0}")]
    UnsupportedSource(String),
    #[error("Failed to fetch source metadata: {0}")]
    Metadata(#[from] FetchError),
    #[error("Ledger write failed: {0}")]
    Ledger(#[from] LedgerError),
}

/// A single page's failure, recorded in the ledger as `error: <message>`.
#[derive(Error, Debug)]
enum PageError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("{0}")]
    Post(#[from] PostError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
}

/// Summary of one ingestion or retry run. Correctness is observed through
/// the ledger; this is a convenience for callers and logs.
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    pub batches: usize,
    pub pages_done: usize,
    pub pages_empty: usize,
    pub pages_failed: usize,
}

impl IngestionReport {
    fn absorb(&mut self, other: &IngestionReport) {
        self.pages_done += other.pages_done;
        self.pages_empty += other.pages_empty;
        self.pages_failed += other.pages_failed;
    }
}

/// Orchestrates batched ingestion of the external news source.
pub struct NewsIngestor {
    fetcher: PageFetcher,
    ledger: StatusLedger,
    source: String,
    batch_size: u32,
}

impl NewsIngestor {
    pub fn new(fetcher: PageFetcher, ledger: StatusLedger, source: impl Into<String>) -> Self {
        Self {
            fetcher,
            ledger,
            source: source.into(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn ledger(&self) -> &StatusLedger {
        &self.ledger
    }

    /// Runs a full ingestion for `source`: fetches pagination metadata,
    /// plans batches (optionally capped by `limit` pages), and processes
    /// each batch in order, logging its start in the ledger.
    pub async fn ingest(
        &self,
        source: &str,
        limit: Option<u32>,
    ) -> Result<IngestionReport, IngestError> {
        if source != self.source {
            return Err(IngestError::UnsupportedSource(source.to_string()));
        }

        self.ledger.ensure_tables().await?;

        let metadata = self.fetcher.fetch_page(1).await?;
        let batches = generate_batches(metadata.total_pages, self.batch_size, limit);
        info!(
            source,
            total_pages = metadata.total_pages,
            batches = batches.len(),
            "Starting ingestion run"
        );

        let mut report = IngestionReport {
            batches: batches.len(),
            ..Default::default()
        };
        for (index, pages) in batches.iter().enumerate() {
            let batch_number = (index + 1) as u32;
            self.ledger.log_batch_start(batch_number).await?;
            let outcome = self.process_batch(batch_number, pages).await?;
            report.absorb(&outcome);
        }

        info!(?report, "Ingestion run finished");
        Ok(report)
    }

    /// Processes every page of one batch independently.
    ///
    /// Each page moves through `started` to a terminal status: `done` when
    /// items were persisted, `no posts` when the page was empty, or
    /// `error: <message>` when any step failed. A failing page is recorded
    /// and the loop continues with its siblings.
    pub async fn process_batch(
        &self,
        batch_number: u32,
        pages: &[u32],
    ) -> Result<IngestionReport, IngestError> {
        let mut report = IngestionReport::default();

        for &page in pages {
            self.ledger
                .log_page_status(batch_number, page, &PageStatus::Started)
                .await?;

            match self.process_page(batch_number, page).await {
                Ok(count) if count > 0 => {
                    self.ledger
                        .log_page_status(batch_number, page, &PageStatus::Done)
                        .await?;
                    report.pages_done += 1;
                }
                Ok(_) => {
                    self.ledger
                        .log_page_status(batch_number, page, &PageStatus::NoPosts)
                        .await?;
                    report.pages_empty += 1;
                }
                Err(err) => {
                    error!(batch_number, page, "Page processing failed: {err}");
                    self.ledger
                        .log_page_status(batch_number, page, &PageStatus::Error(err.to_string()))
                        .await?;
                    report.pages_failed += 1;
                }
            }
        }

        Ok(report)
    }

    async fn process_page(&self, batch_number: u32, page: u32) -> Result<usize, PageError> {
        let payload = self.fetcher.fetch_page(page).await?;
        let posts = extract_posts(&payload.posts, &self.source)?;
        if posts.is_empty() {
            return Ok(0);
        }

        let conn = self.ledger.connect()?;
        let count = insert_posts(
            &conn,
            &self.ledger.tables().posts,
            &posts,
            batch_number,
            page,
        )
        .await?;
        Ok(count)
    }

    /// Reprocesses exactly the pages whose latest ledger status is not
    /// "done", grouped by their original batch numbers, with the same
    /// per-page isolation as a fresh run.
    pub async fn retry_incomplete(&self) -> Result<IngestionReport, IngestError> {
        let pending = self.ledger.find_incomplete_pages().await?;
        info!(batches = pending.len(), "Retrying incomplete pages");

        let mut report = IngestionReport {
            batches: pending.len(),
            ..Default::default()
        };
        for (batch_number, pages) in pending {
            let outcome = self.process_batch(batch_number, &pages).await?;
            report.absorb(&outcome);
        }
        Ok(report)
    }
}
