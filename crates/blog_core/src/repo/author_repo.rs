//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `authors` table.
//! - Enforce author-name uniqueness at write time.
//!
//! # Invariants
//! - The uniqueness check and the write run in one `IMMEDIATE` transaction.
//! - A `UNIQUE` violation raised by storage maps to the same validation error
//!   as the explicit check.
//! - A rejected write leaves the stored row untouched.

use crate::model::author::{Author, AuthorId, AuthorNameIndex, AuthorUpdate, NewAuthor};
use crate::model::validation::ValidationError;
use crate::repo::{
    current_epoch_ms, ensure_table_ready, push_pagination, RepoError, RepoResult,
};
use log::{error, info, warn};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone_number,
    created_at,
    updated_at
FROM authors";

const AUTHOR_COLUMNS: &[&str] = &["id", "name", "phone_number", "created_at", "updated_at"];

/// Query options for listing authors.
#[derive(Debug, Clone, Default)]
pub struct AuthorListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for author CRUD operations.
pub trait AuthorRepository {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn update_author(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    /// Lists authors ordered by `id ASC`.
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, "authors", AUTHOR_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl SqliteAuthorRepository<'_> {
    fn insert_checked(&self, author: &NewAuthor) -> RepoResult<Author> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        author.check_unique(&NameLookup(&tx))?;

        tx.execute(
            "INSERT INTO authors (name, phone_number) VALUES (?1, ?2);",
            params![author.name(), author.phone_number()],
        )
        .map_err(map_name_conflict)?;

        let id = tx.last_insert_rowid();
        let created = load_author(&tx, id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created author {id} not found in read-back"))
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn update_checked(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_author(&tx, id)?.ok_or(RepoError::AuthorNotFound(id))?;
        update.check_unique(&NameLookup(&tx), id)?;

        let next = current.apply(update, current_epoch_ms(&tx)?);
        tx.execute(
            "UPDATE authors
             SET
                name = ?2,
                phone_number = ?3,
                updated_at = ?4
             WHERE id = ?1;",
            params![id, next.name(), next.phone_number(), next.updated_at()],
        )
        .map_err(map_name_conflict)?;
        tx.commit()?;
        Ok(next)
    }
}

impl AuthorNameIndex for SqliteAuthorRepository<'_> {
    type Error = RepoError;

    fn author_id_by_name(&self, name: &str) -> RepoResult<Option<AuthorId>> {
        author_id_by_name(self.conn, name)
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        let result = self.insert_checked(author);
        match &result {
            Ok(created) => info!(
                "event=author_create module=repo status=ok author_id={}",
                created.id()
            ),
            Err(err) => log_failure("author_create", None, err),
        }
        result
    }

    fn update_author(&self, id: AuthorId, update: &AuthorUpdate) -> RepoResult<Author> {
        let result = self.update_checked(id, update);
        match &result {
            Ok(_) => info!("event=author_update module=repo status=ok author_id={id}"),
            Err(err) => log_failure("author_update", Some(id), err),
        }
        result
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        load_author(self.conn, id)
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }
        Ok(None)
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::AuthorNotFound(id));
        }

        info!("event=author_delete module=repo status=ok author_id={id}");
        Ok(())
    }
}

/// Name index bound to an open transaction.
struct NameLookup<'a>(&'a Connection);

impl AuthorNameIndex for NameLookup<'_> {
    type Error = RepoError;

    fn author_id_by_name(&self, name: &str) -> RepoResult<Option<AuthorId>> {
        author_id_by_name(self.0, name)
    }
}

fn author_id_by_name(conn: &Connection, name: &str) -> RepoResult<Option<AuthorId>> {
    let mut stmt = conn.prepare("SELECT id FROM authors WHERE name = ?1;")?;
    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(row.get(0)?));
    }
    Ok(None)
}

fn load_author(conn: &Connection, id: AuthorId) -> RepoResult<Option<Author>> {
    let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_author_row(row)?));
    }
    Ok(None)
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id: AuthorId = row.get("id")?;
    Author::from_storage(
        id,
        row.get("name")?,
        row.get("phone_number")?,
        row.get("created_at")?,
        row.get("updated_at")?,
    )
    .map_err(|err| RepoError::InvalidData(format!("author {id}: {err}")))
}

fn map_name_conflict(err: rusqlite::Error) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE {
            return RepoError::Validation(ValidationError::AuthorNameTaken);
        }
    }
    err.into()
}

fn log_failure(event: &str, id: Option<AuthorId>, err: &RepoError) {
    let id = id.map_or_else(|| "none".to_string(), |id| id.to_string());
    match err {
        RepoError::Validation(rule) => warn!(
            "event={event} module=repo status=rejected author_id={id} field={} error_code={}",
            rule.field(),
            err.log_code()
        ),
        RepoError::AuthorNotFound(_) => warn!(
            "event={event} module=repo status=rejected author_id={id} error_code={}",
            err.log_code()
        ),
        _ => error!(
            "event={event} module=repo status=error author_id={id} error_code={} error={err}",
            err.log_code()
        ),
    }
}
