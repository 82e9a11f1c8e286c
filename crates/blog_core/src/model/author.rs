//! Author domain model.
//!
//! # Responsibility
//! - Define the stored `Author` record and its validated write inputs.
//! - Provide the name-uniqueness rule over an injected name index.
//!
//! # Invariants
//! - `NewAuthor` and `AuthorUpdate` only ever hold values that passed their
//!   field rules; setters reject invalid input without touching the builder.
//! - An author name is unique across the whole collection (exact,
//!   case-sensitive match on the trimmed value).
//! - `created_at` never changes after creation; `updated_at` is `None` until
//!   the first update.

use crate::model::validation::{self, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned author identifier.
pub type AuthorId = i64;

/// Persisted author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    id: AuthorId,
    name: String,
    phone_number: String,
    /// Unix epoch milliseconds.
    created_at: i64,
    /// Unix epoch milliseconds of the latest update.
    updated_at: Option<i64>,
}

impl Author {
    /// Rebuilds an author from stored columns, re-running field rules.
    pub(crate) fn from_storage(
        id: AuthorId,
        name: String,
        phone_number: String,
        created_at: i64,
        updated_at: Option<i64>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id,
            name: validation::author_name(&name)?,
            phone_number: validation::phone_number(&phone_number)?,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> AuthorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    /// Returns a copy with `update` applied and `updated_at` set to `now_ms`.
    ///
    /// Uniqueness of a changed name is the caller's responsibility, see
    /// `AuthorUpdate::check_unique`.
    pub fn apply(&self, update: &AuthorUpdate, now_ms: i64) -> Self {
        Self {
            id: self.id,
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            phone_number: update
                .phone_number
                .clone()
                .unwrap_or_else(|| self.phone_number.clone()),
            created_at: self.created_at,
            updated_at: Some(now_ms),
        }
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Author(id={}, name={})", self.id, self.name)
    }
}

/// Lookup capability used by the author-name uniqueness rule.
pub trait AuthorNameIndex {
    type Error: From<ValidationError>;

    /// Returns the id of the author whose name equals `name` exactly.
    fn author_id_by_name(&self, name: &str) -> Result<Option<AuthorId>, Self::Error>;
}

impl AuthorNameIndex for [Author] {
    type Error = ValidationError;

    fn author_id_by_name(&self, name: &str) -> Result<Option<AuthorId>, Self::Error> {
        Ok(self
            .iter()
            .find(|author| author.name == name)
            .map(|author| author.id))
    }
}

/// Rejects `name` when it is held by any author other than `current`.
///
/// Pass `current = None` for creation and `Some(id)` for updates so an
/// author may keep its own name.
pub fn ensure_author_name_available<I>(
    index: &I,
    name: &str,
    current: Option<AuthorId>,
) -> Result<(), I::Error>
where
    I: AuthorNameIndex + ?Sized,
{
    match index.author_id_by_name(name)? {
        Some(owner) if Some(owner) != current => Err(ValidationError::AuthorNameTaken.into()),
        _ => Ok(()),
    }
}

/// Validated input for creating an author.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "AuthorInput")]
pub struct NewAuthor {
    name: String,
    phone_number: String,
}

impl NewAuthor {
    pub fn builder() -> AuthorBuilder {
        AuthorBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Runs the uniqueness rule against `index`.
    pub fn check_unique<I>(&self, index: &I) -> Result<(), I::Error>
    where
        I: AuthorNameIndex + ?Sized,
    {
        ensure_author_name_available(index, &self.name, None)
    }
}

/// Fallible builder for `NewAuthor`.
#[derive(Debug, Clone, Default)]
pub struct AuthorBuilder {
    name: Option<String>,
    phone_number: Option<String>,
}

impl AuthorBuilder {
    /// Sets the trimmed name, rejecting empty or whitespace-only input.
    pub fn name(mut self, value: &str) -> ValidationResult<Self> {
        self.name = Some(validation::author_name(value)?);
        Ok(self)
    }

    /// Sets the phone number, rejecting anything but ten ASCII digits.
    pub fn phone_number(mut self, value: &str) -> ValidationResult<Self> {
        self.phone_number = Some(validation::phone_number(value)?);
        Ok(self)
    }

    /// Finishes the builder, reporting the first missing required field.
    pub fn build(self) -> ValidationResult<NewAuthor> {
        Ok(NewAuthor {
            name: self.name.ok_or(ValidationError::AuthorNameMissing)?,
            phone_number: self
                .phone_number
                .ok_or(ValidationError::PhoneNumberMissing)?,
        })
    }
}

/// Raw author input as supplied by an API layer.
#[derive(Debug, Deserialize)]
struct AuthorInput {
    name: Option<String>,
    phone_number: Option<String>,
}

impl TryFrom<AuthorInput> for NewAuthor {
    type Error = ValidationError;

    fn try_from(input: AuthorInput) -> Result<Self, Self::Error> {
        let mut builder = NewAuthor::builder();
        if let Some(name) = input.name.as_deref() {
            builder = builder.name(name)?;
        }
        if let Some(phone_number) = input.phone_number.as_deref() {
            builder = builder.phone_number(phone_number)?;
        }
        builder.build()
    }
}

/// Validated partial change to an existing author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorUpdate {
    name: Option<String>,
    phone_number: Option<String>,
}

impl AuthorUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the name. Same rule as `AuthorBuilder::name`.
    pub fn name(mut self, value: &str) -> ValidationResult<Self> {
        self.name = Some(validation::author_name(value)?);
        Ok(self)
    }

    /// Replaces the phone number. Same rule as `AuthorBuilder::phone_number`.
    pub fn phone_number(mut self, value: &str) -> ValidationResult<Self> {
        self.phone_number = Some(validation::phone_number(value)?);
        Ok(self)
    }

    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none()
    }

    /// Runs the uniqueness rule for a changed name on author `id`.
    pub fn check_unique<I>(&self, index: &I, id: AuthorId) -> Result<(), I::Error>
    where
        I: AuthorNameIndex + ?Sized,
    {
        match self.name.as_deref() {
            Some(name) => ensure_author_name_available(index, name, Some(id)),
            None => Ok(()),
        }
    }
}
