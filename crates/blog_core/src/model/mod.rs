//! Blog domain model.
//!
//! # Responsibility
//! - Define the author/post records and their validated write inputs.
//! - Keep every field rule in one place (`validation`).
//!
//! # Invariants
//! - Records can only be written from builder/update values that passed
//!   their field rules.
//! - Author-name uniqueness is checked against an injected `AuthorNameIndex`,
//!   never against global state.

pub mod author;
pub mod post;
pub mod validation;
