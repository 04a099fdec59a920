//! # SQLite Specific SQL Statements
//!
//! This module centralizes the DDL for the content store and the status
//! ledger. Table names come from configuration, so every statement is
//! built against the caller-supplied name.

/// DDL for the content store. Rows are keyed by the source-stable post id,
/// so retried pages upsert instead of duplicating.
pub fn posts_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id TEXT PRIMARY KEY,
            batch_number INTEGER NOT NULL,
            page_number INTEGER NOT NULL,
            title TEXT NOT NULL,
            content TEXT,
            date_gmt TEXT,
            modified_gmt TEXT,
            link TEXT,
            status TEXT,
            excerpt TEXT,
            author_id INTEGER,
            author_name TEXT,
            editor TEXT,
            comments_count INTEGER,
            source TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );"
    )
}

/// DDL for the append-only batch log.
pub fn batch_log_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_number INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );"
    )
}

/// DDL for the page-status ledger, keyed by (batch_number, page_number).
pub fn page_status_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            batch_number INTEGER NOT NULL,
            page_number INTEGER NOT NULL,
            status TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (batch_number, page_number)
        );"
    )
}
