//! # Ragwright
//!
//! This crate provides the core of a retrieval-augmented article-writing
//! backend: a resumable, batch-oriented ingestion pipeline for an external
//! news source, and a multi-stage LLM content-generation pipeline
//! (research questions → headlines → draft → topic sentences → full
//! content → edit) with strict, typed stage schemas.

pub mod constants;
pub mod errors;
pub mod generation;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod research;
pub mod types;

pub use errors::LlmError;
pub use generation::{
    parser::DataError,
    stages::{GenerationError, StageClient},
};
pub use ingest::{
    batch::generate_batches,
    fetcher::{CookieFile, FetchError, PageFetcher},
    ledger::{LedgerTables, PageStatus, StatusLedger},
    pipeline::{IngestError, IngestionReport, NewsIngestor},
};
pub use types::ProviderConfig;
