use blog_core::db::migrations::{current_user_version, latest_version};
use blog_core::db::{open_db, open_db_in_memory, DbError};
use blog_core::{AuthorRepository, NewAuthor, SqliteAuthorRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "authors");
    assert_table_exists(&conn, "posts");
}

#[test]
fn reopening_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.sqlite3");

    let conn_first = open_db(&path).unwrap();
    {
        let repo = SqliteAuthorRepository::try_new(&conn_first).unwrap();
        let author = NewAuthor::builder()
            .name("Ann")
            .unwrap()
            .phone_number("5550000001")
            .unwrap()
            .build()
            .unwrap();
        repo.create_author(&author).unwrap();
    }
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(current_user_version(&conn_second).unwrap(), latest_version());
    let repo = SqliteAuthorRepository::try_new(&conn_second).unwrap();
    assert!(repo.find_author_by_name("Ann").unwrap().is_some());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn category_index_exists() {
    let conn = open_db_in_memory().unwrap();
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'index' AND name = 'idx_posts_category'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
