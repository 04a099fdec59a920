//! Application-wide constants and defaults.

/// Default number of pages per ingestion batch.
pub const DEFAULT_BATCH_SIZE: u32 = 30;

/// Maximum attempts for a single page fetch before the error is terminal.
pub const MAX_FETCH_RETRIES: u32 = 5;

/// Base delay for exponential fetch backoff, in seconds.
pub const BACKOFF_BASE_SECS: u64 = 1;

/// Default table names for the content store and the status ledger.
/// Deployments override these through configuration.
pub const DEFAULT_POSTS_TABLE: &str = "posts";
pub const DEFAULT_BATCH_LOG_TABLE: &str = "batch_log";
pub const DEFAULT_PAGE_STATUS_TABLE: &str = "page_status";

/// Number of style examples sampled per category for flair edits.
pub const STYLE_EXAMPLES_PER_CATEGORY: usize = 3;
