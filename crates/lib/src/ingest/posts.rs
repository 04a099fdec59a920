//! # Post Extraction and Storage
//!
//! Normalizes raw source items into `Post` records and upserts them into
//! the content store, tagged with the batch and page that produced them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use turso::{params, Connection};

/// Custom error types for post extraction and persistence.
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Database error: {0}")]
    Database(#[from] turso::Error),
    #[error("Source item is missing expected field `{0}`")]
    MissingField(&'static str),
}

/// A normalized record extracted from one raw source item.
///
/// `id` is the source's stable identifier, so re-ingesting the same item
/// updates the existing row instead of duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date_gmt: String,
    pub modified_gmt: String,
    pub link: String,
    pub status: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub editor: String,
    #[serde(default)]
    pub comments_count: i64,
    pub source: String,
}

fn required_str(item: &Value, field: &'static str) -> Result<String, PostError> {
    match item.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(PostError::MissingField(field)),
    }
}

fn optional_str(item: &Value, field: &str) -> String {
    item.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Extracts the normalized post records from one raw source page.
///
/// A missing required field fails the whole page: the caller records the
/// page as errored and moves on.
pub fn extract_posts(raw_posts: &[Value], source: &str) -> Result<Vec<Post>, PostError> {
    raw_posts
        .iter()
        .map(|item| {
            let author = item.get("author");
            let author_id = author
                .and_then(|a| a.get("id"))
                .and_then(Value::as_i64);
            let author_name = author.map(|a| {
                let first = a.get("first_name").and_then(Value::as_str).unwrap_or("");
                let last = a.get("last_name").and_then(Value::as_str).unwrap_or("");
                format!("{first} {last}").trim().to_string()
            });

            Ok(Post {
                id: required_str(item, "id")?,
                title: required_str(item, "title")?,
                content: required_str(item, "content")?,
                date_gmt: required_str(item, "date_gmt")?,
                modified_gmt: required_str(item, "modified_gmt")?,
                link: required_str(item, "link")?,
                status: required_str(item, "status")?,
                excerpt: optional_str(item, "excerpt"),
                author_id,
                author_name: author_name.filter(|name| !name.is_empty()),
                editor: optional_str(item, "editor"),
                comments_count: item
                    .get("comments_count")
                    .and_then(Value::as_i64)
                    .unwrap_or(0),
                source: source.to_string(),
            })
        })
        .collect()
}

/// Upserts a batch of posts into the content store within one transaction,
/// tagging each row with the batch and page that produced it.
///
/// Rows conflict on the source-stable `id`, so retried pages overwrite
/// rather than duplicate.
pub async fn insert_posts(
    conn: &Connection,
    table: &str,
    posts: &[Post],
    batch_number: u32,
    page_number: u32,
) -> Result<usize, PostError> {
    if posts.is_empty() {
        return Ok(0);
    }

    conn.execute("BEGIN TRANSACTION", ()).await?;

    let stmt_sql = format!(
        "INSERT INTO {table} (id, batch_number, page_number, title, content, date_gmt,
            modified_gmt, link, status, excerpt, author_id, author_name, editor,
            comments_count, source)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            batch_number = excluded.batch_number,
            page_number = excluded.page_number,
            title = excluded.title,
            content = excluded.content,
            modified_gmt = excluded.modified_gmt,
            status = excluded.status,
            excerpt = excluded.excerpt,
            editor = excluded.editor,
            comments_count = excluded.comments_count"
    );
    let mut stmt = conn.prepare(&stmt_sql).await?;

    for post in posts {
        let result = stmt
            .execute(params![
                post.id.clone(),
                batch_number as i64,
                page_number as i64,
                post.title.clone(),
                post.content.clone(),
                post.date_gmt.clone(),
                post.modified_gmt.clone(),
                post.link.clone(),
                post.status.clone(),
                post.excerpt.clone(),
                post.author_id,
                post.author_name.clone(),
                post.editor.clone(),
                post.comments_count,
                post.source.clone()
            ])
            .await;

        if let Err(e) = result {
            conn.execute("ROLLBACK", ()).await?;
            return Err(PostError::Database(e));
        }
    }

    conn.execute("COMMIT", ()).await?;
    info!(
        count = posts.len(),
        batch_number, page_number, "Persisted posts for page"
    );

    Ok(posts.len())
}
