//! Post domain model.
//!
//! # Responsibility
//! - Define the stored `Post` record, its category set and validated inputs.
//!
//! # Invariants
//! - Titles are trimmed and never start with a clickbait prefix.
//! - Content keeps its original whitespace and is at least 250 chars long.
//! - `summary` is either absent or at most 250 chars long.

use crate::model::validation::{self, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned post identifier.
pub type PostId = i64;

/// Allowed post categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostCategory {
    #[serde(rename = "Fiction")]
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
}

impl PostCategory {
    /// Trims `value` and matches it exactly against the category names.
    pub fn parse(value: &str) -> ValidationResult<Self> {
        match value.trim() {
            "Fiction" => Ok(Self::Fiction),
            "Non-Fiction" => Ok(Self::NonFiction),
            _ => Err(ValidationError::PostCategoryInvalid),
        }
    }

    /// Canonical name used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
        }
    }
}

impl Display for PostCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    category: PostCategory,
    summary: Option<String>,
    /// Unix epoch milliseconds.
    created_at: i64,
    /// Unix epoch milliseconds of the latest update.
    updated_at: Option<i64>,
}

impl Post {
    /// Rebuilds a post from stored columns, re-running field rules.
    pub(crate) fn from_storage(
        id: PostId,
        title: String,
        content: String,
        category: &str,
        summary: Option<String>,
        created_at: i64,
        updated_at: Option<i64>,
    ) -> ValidationResult<Self> {
        Ok(Self {
            id,
            title: validation::post_title(&title)?,
            content: validation::post_content(&content)?,
            category: PostCategory::parse(category)?,
            summary: validation::post_summary(summary.as_deref())?,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> PostCategory {
        self.category
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.updated_at
    }

    /// Returns a copy with `update` applied and `updated_at` set to `now_ms`.
    pub fn apply(&self, update: &PostUpdate, now_ms: i64) -> Self {
        Self {
            id: self.id,
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            content: update
                .content
                .clone()
                .unwrap_or_else(|| self.content.clone()),
            category: update.category.unwrap_or(self.category),
            summary: match &update.summary {
                Some(summary) => summary.clone(),
                None => self.summary.clone(),
            },
            created_at: self.created_at,
            updated_at: Some(now_ms),
        }
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Post(id={}, title={} content={}, summary={})",
            self.id,
            self.title,
            self.content,
            self.summary.as_deref().unwrap_or("None")
        )
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "PostInput")]
pub struct NewPost {
    title: String,
    content: String,
    category: PostCategory,
    summary: Option<String>,
}

impl NewPost {
    pub fn builder() -> PostBuilder {
        PostBuilder::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> PostCategory {
        self.category
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// Fallible builder for `NewPost`.
#[derive(Debug, Clone, Default)]
pub struct PostBuilder {
    title: Option<String>,
    content: Option<String>,
    category: Option<PostCategory>,
    summary: Option<String>,
}

impl PostBuilder {
    pub fn title(mut self, value: &str) -> ValidationResult<Self> {
        self.title = Some(validation::post_title(value)?);
        Ok(self)
    }

    pub fn content(mut self, value: &str) -> ValidationResult<Self> {
        self.content = Some(validation::post_content(value)?);
        Ok(self)
    }

    pub fn category(mut self, value: &str) -> ValidationResult<Self> {
        self.category = Some(PostCategory::parse(value)?);
        Ok(self)
    }

    /// Sets or clears the summary. `None` is always accepted.
    pub fn summary(mut self, value: Option<&str>) -> ValidationResult<Self> {
        self.summary = validation::post_summary(value)?;
        Ok(self)
    }

    /// Finishes the builder, reporting the first missing required field.
    pub fn build(self) -> ValidationResult<NewPost> {
        Ok(NewPost {
            title: self.title.ok_or(ValidationError::PostTitleMissing)?,
            content: self.content.ok_or(ValidationError::PostContentMissing)?,
            category: self.category.ok_or(ValidationError::PostCategoryMissing)?,
            summary: self.summary,
        })
    }
}

#[derive(Debug, Deserialize)]
struct PostInput {
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    #[serde(default)]
    summary: Option<String>,
}

impl TryFrom<PostInput> for NewPost {
    type Error = ValidationError;

    fn try_from(input: PostInput) -> Result<Self, Self::Error> {
        let mut builder = NewPost::builder();
        if let Some(title) = input.title.as_deref() {
            builder = builder.title(title)?;
        }
        if let Some(content) = input.content.as_deref() {
            builder = builder.content(content)?;
        }
        if let Some(category) = input.category.as_deref() {
            builder = builder.category(category)?;
        }
        builder.summary(input.summary.as_deref())?.build()
    }
}

/// Validated partial change to an existing post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    title: Option<String>,
    content: Option<String>,
    category: Option<PostCategory>,
    // Outer `None` keeps the stored summary, `Some(None)` clears it.
    summary: Option<Option<String>>,
}

impl PostUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, value: &str) -> ValidationResult<Self> {
        self.title = Some(validation::post_title(value)?);
        Ok(self)
    }

    pub fn content(mut self, value: &str) -> ValidationResult<Self> {
        self.content = Some(validation::post_content(value)?);
        Ok(self)
    }

    pub fn category(mut self, value: &str) -> ValidationResult<Self> {
        self.category = Some(PostCategory::parse(value)?);
        Ok(self)
    }

    pub fn summary(mut self, value: Option<&str>) -> ValidationResult<Self> {
        self.summary = Some(validation::post_summary(value)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.summary.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_content() -> String {
        "x".repeat(300)
    }

    #[test]
    fn category_is_trimmed_and_exact() {
        assert_eq!(
            PostCategory::parse("  Non-Fiction ").unwrap(),
            PostCategory::NonFiction
        );
        assert_eq!(
            PostCategory::parse("fiction").unwrap_err(),
            ValidationError::PostCategoryInvalid
        );
        assert_eq!(
            PostCategory::parse("").unwrap_err(),
            ValidationError::PostCategoryInvalid
        );
    }

    #[test]
    fn builder_reports_missing_required_fields() {
        assert_eq!(
            NewPost::builder().build().unwrap_err(),
            ValidationError::PostTitleMissing
        );
        let err = NewPost::builder()
            .title("Quiet")
            .unwrap()
            .content(&long_content())
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::PostCategoryMissing);
    }

    #[test]
    fn apply_handles_summary_tri_state() {
        let post = Post::from_storage(
            1,
            "Quiet".to_string(),
            long_content(),
            "Fiction",
            Some("short".to_string()),
            10,
            None,
        )
        .unwrap();

        let keep = post.apply(&PostUpdate::new().title("Calm").unwrap(), 20);
        assert_eq!(keep.title(), "Calm");
        assert_eq!(keep.summary(), Some("short"));
        assert_eq!(keep.updated_at(), Some(20));

        let cleared = post.apply(&PostUpdate::new().summary(None).unwrap(), 30);
        assert_eq!(cleared.summary(), None);
        assert_eq!(cleared.title(), "Quiet");
    }

    #[test]
    fn display_renders_absent_summary_as_none() {
        let post = Post::from_storage(
            4,
            "Quiet".to_string(),
            long_content(),
            "Fiction",
            None,
            10,
            None,
        )
        .unwrap();
        assert_eq!(
            post.to_string(),
            format!("Post(id=4, title=Quiet content={}, summary=None)", long_content())
        );

        let summarized = post.apply(&PostUpdate::new().summary(Some("calm")).unwrap(), 20);
        assert!(summarized.to_string().ends_with(", summary=calm)"));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(PostUpdate::new().is_empty());
        assert!(!PostUpdate::new().summary(None).unwrap().is_empty());
    }
}
