//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `blog_core` linkage, configuration and storage bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use blog_core::db::migrations::{current_user_version, latest_version};
use blog_core::db::{open_db, open_db_in_memory};
use blog_core::{
    init_logging_from_config, AuthorListQuery, AuthorRepository, BlogConfig, PostListQuery,
    PostRepository, SqliteAuthorRepository, SqlitePostRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blog: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("blog_core ping={}", blog_core::ping());
    println!("blog_core version={}", blog_core::core_version());

    let config = BlogConfig::from_env()?;
    if init_logging_from_config(&config)? {
        println!("logging level={}", config.log_level);
    }

    let conn = match config.db_path.as_deref() {
        Some(path) => {
            println!("db mode=file path={}", path.display());
            open_db(path)?
        }
        None => {
            println!("db mode=memory");
            open_db_in_memory()?
        }
    };
    println!(
        "db schema_version={} latest={}",
        current_user_version(&conn)?,
        latest_version()
    );

    let authors =
        SqliteAuthorRepository::try_new(&conn)?.list_authors(&AuthorListQuery::default())?;
    let posts = SqlitePostRepository::try_new(&conn)?.list_posts(&PostListQuery::default())?;
    println!("authors count={}", authors.len());
    println!("posts count={}", posts.len());

    info!(
        "event=cli_smoke module=cli status=ok authors={} posts={}",
        authors.len(),
        posts.len()
    );
    Ok(())
}
