//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `posts` table.
//!
//! # Invariants
//! - Content is written byte-for-byte as validated; it is never trimmed.
//! - Category is stored as its canonical name (`Fiction` / `Non-Fiction`).
//! - List order is `id ASC`.

use crate::model::post::{NewPost, Post, PostCategory, PostId, PostUpdate};
use crate::repo::{
    current_epoch_ms, ensure_table_ready, push_pagination, RepoError, RepoResult,
};
use log::{error, info, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    summary,
    created_at,
    updated_at
FROM posts";

const POST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "category",
    "summary",
    "created_at",
    "updated_at",
];

/// Query options for listing posts.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub category: Option<PostCategory>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for post CRUD operations.
pub trait PostRepository {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post>;
    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepoResult<Post>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "posts", POST_COLUMNS)?;
        Ok(Self { conn })
    }

    fn insert_in_tx(&self, post: &NewPost) -> RepoResult<Post> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO posts (title, content, category, summary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                post.title(),
                post.content(),
                post.category().as_str(),
                post.summary(),
            ],
        )?;

        let id = tx.last_insert_rowid();
        let created = load_post(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created post {id} not found in read-back"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn update_in_tx(&self, id: PostId, update: &PostUpdate) -> RepoResult<Post> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_post(&tx, id)?.ok_or(RepoError::PostNotFound(id))?;
        let next = current.apply(update, current_epoch_ms(&tx)?);

        tx.execute(
            "UPDATE posts
             SET
                title = ?2,
                content = ?3,
                category = ?4,
                summary = ?5,
                updated_at = ?6
             WHERE id = ?1;",
            params![
                id,
                next.title(),
                next.content(),
                next.category().as_str(),
                next.summary(),
                next.updated_at(),
            ],
        )?;
        tx.commit()?;
        Ok(next)
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        let result = self.insert_in_tx(post);
        match &result {
            Ok(created) => info!(
                "event=post_create module=repo status=ok post_id={} category={}",
                created.id(),
                created.category()
            ),
            Err(err) => log_failure("post_create", None, err),
        }
        result
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> RepoResult<Post> {
        let result = self.update_in_tx(id, update);
        match &result {
            Ok(_) => info!("event=post_update module=repo status=ok post_id={id}"),
            Err(err) => log_failure("post_update", Some(id), err),
        }
        result
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        load_post(self.conn, id)
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::PostNotFound(id));
        }

        info!("event=post_delete module=repo status=ok post_id={id}");
        Ok(())
    }
}

fn load_post(conn: &Connection, id: PostId) -> RepoResult<Option<Post>> {
    let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_post_row(row)?));
    }
    Ok(None)
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;
    let category: String = row.get("category")?;
    Post::from_storage(
        id,
        row.get("title")?,
        row.get("content")?,
        &category,
        row.get("summary")?,
        row.get("created_at")?,
        row.get("updated_at")?,
    )
    .map_err(|err| RepoError::InvalidData(format!("post {id}: {err}")))
}

fn log_failure(event: &str, id: Option<PostId>, err: &RepoError) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        RepoError::PostNotFound(_) => warn!(
            "event={event} module=repo status=rejected post_id={id} error_code={}",
            err.log_code()
        ),
        _ => error!(
            "event={event} module=repo status=error post_id={id} error_code={} error={err}",
            err.log_code()
        ),
    }
}
