//! Core records and write-time validation for the blog store.
//! This crate is the single source of truth for author/post invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{BlogConfig, ConfigError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::author::{
    ensure_author_name_available, Author, AuthorBuilder, AuthorId, AuthorNameIndex,
    AuthorUpdate, NewAuthor,
};
pub use model::post::{NewPost, Post, PostBuilder, PostCategory, PostId, PostUpdate};
pub use model::validation::{ValidationError, ValidationResult};
pub use repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::{RepoError, RepoResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
