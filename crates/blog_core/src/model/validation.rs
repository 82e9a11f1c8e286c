//! Field-level validation rules for authors and posts.
//!
//! # Responsibility
//! - Own every write-time field rule as a pure function.
//! - Map each violated rule to exactly one `ValidationError` variant.
//!
//! # Invariants
//! - Rules never mutate caller state; they return the accepted value or an error.
//! - Name/title/category values are trimmed before they are checked and stored.
//! - Post content is stored exactly as supplied.
//! - Lengths are counted in Unicode scalar values, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required number of digits in an author phone number.
pub const PHONE_NUMBER_DIGITS: usize = 10;
/// Minimum post content length, counted on the untrimmed value.
pub const CONTENT_MIN_CHARS: usize = 250;
/// Maximum post summary length.
pub const SUMMARY_MAX_CHARS: usize = 250;
/// Title prefixes rejected as clickbait. Matching is case-sensitive.
pub const CLICKBAIT_PREFIXES: [&str; 3] = ["Why", "Top", "Guess"];

static ASCII_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Rejection raised when a field value violates its declared constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    AuthorNameMissing,
    AuthorNameTaken,
    PhoneNumberMissing,
    PhoneNumberNotDigits,
    PhoneNumberWrongLength,
    PostTitleMissing,
    PostTitleClickbait,
    PostContentMissing,
    PostContentTooShort,
    PostCategoryMissing,
    PostCategoryInvalid,
    PostSummaryTooLong,
}

impl ValidationError {
    /// Name of the record field the violated rule belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::AuthorNameMissing | Self::AuthorNameTaken => "name",
            Self::PhoneNumberMissing
            | Self::PhoneNumberNotDigits
            | Self::PhoneNumberWrongLength => "phone_number",
            Self::PostTitleMissing | Self::PostTitleClickbait => "title",
            Self::PostContentMissing | Self::PostContentTooShort => "content",
            Self::PostCategoryMissing | Self::PostCategoryInvalid => "category",
            Self::PostSummaryTooLong => "summary",
        }
    }

    /// Human-readable description of the violated rule.
    pub fn message(&self) -> &'static str {
        match self {
            Self::AuthorNameMissing => "Author must have a name",
            Self::AuthorNameTaken => "Author name must be unique",
            Self::PhoneNumberMissing => "Phone number is required",
            Self::PhoneNumberNotDigits => "Phone number must contain only digits",
            Self::PhoneNumberWrongLength => "Phone number must be exactly ten digits",
            Self::PostTitleMissing => "Post must have a title",
            Self::PostTitleClickbait => "Post title cannot be clickbait",
            Self::PostContentMissing => "Post content is required",
            Self::PostContentTooShort => "Post content must be at least 250 characters",
            Self::PostCategoryMissing => "Post must have a category",
            Self::PostCategoryInvalid => "Post category must be Fiction or Non-Fiction",
            Self::PostSummaryTooLong => "Post summary must be 250 characters or fewer",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for ValidationError {}

/// Result alias for field rules.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trims and checks an author name for presence.
///
/// Uniqueness is not checked here; it needs the author collection, see
/// `ensure_author_name_available`.
pub fn author_name(value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::AuthorNameMissing);
    }
    Ok(trimmed.to_string())
}

/// Checks that a phone number is exactly ten ASCII digits.
pub fn phone_number(value: &str) -> ValidationResult<String> {
    if value.is_empty() {
        return Err(ValidationError::PhoneNumberMissing);
    }
    if !ASCII_DIGITS_RE.is_match(value) {
        return Err(ValidationError::PhoneNumberNotDigits);
    }
    // All ASCII at this point, so byte length equals char count.
    if value.len() != PHONE_NUMBER_DIGITS {
        return Err(ValidationError::PhoneNumberWrongLength);
    }
    Ok(value.to_string())
}

/// Trims a post title and rejects empty or clickbait titles.
pub fn post_title(value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::PostTitleMissing);
    }
    if CLICKBAIT_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
    {
        return Err(ValidationError::PostTitleClickbait);
    }
    Ok(trimmed.to_string())
}

/// Checks the minimum post content length. The value is kept untrimmed.
pub fn post_content(value: &str) -> ValidationResult<String> {
    if value.is_empty() {
        return Err(ValidationError::PostContentMissing);
    }
    if value.chars().count() < CONTENT_MIN_CHARS {
        return Err(ValidationError::PostContentTooShort);
    }
    Ok(value.to_string())
}

/// Checks an optional post summary against the maximum length.
pub fn post_summary(value: Option<&str>) -> ValidationResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(summary) if summary.chars().count() > SUMMARY_MAX_CHARS => {
            Err(ValidationError::PostSummaryTooLong)
        }
        Some(summary) => Ok(Some(summary.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_name_is_trimmed() {
        assert_eq!(author_name("  Jane Doe \t").unwrap(), "Jane Doe");
        assert_eq!(
            author_name(" \n ").unwrap_err(),
            ValidationError::AuthorNameMissing
        );
    }

    #[test]
    fn phone_number_checks_run_in_order() {
        assert_eq!(
            phone_number("").unwrap_err(),
            ValidationError::PhoneNumberMissing
        );
        assert_eq!(
            phone_number("555-123-4567").unwrap_err(),
            ValidationError::PhoneNumberNotDigits
        );
        assert_eq!(
            phone_number("12345").unwrap_err(),
            ValidationError::PhoneNumberWrongLength
        );
        assert_eq!(phone_number("5551234567").unwrap(), "5551234567");
    }

    #[test]
    fn phone_number_rejects_non_ascii_digits_and_padding() {
        // Arabic-Indic digits are numeric but not ASCII.
        assert_eq!(
            phone_number("٠١٢٣٤٥٦٧٨٩").unwrap_err(),
            ValidationError::PhoneNumberNotDigits
        );
        assert_eq!(
            phone_number(" 5551234567").unwrap_err(),
            ValidationError::PhoneNumberNotDigits
        );
    }

    #[test]
    fn title_prefix_check_uses_trimmed_value() {
        assert_eq!(
            post_title("  Guess who").unwrap_err(),
            ValidationError::PostTitleClickbait
        );
        assert_eq!(post_title(" A quiet year ").unwrap(), "A quiet year");
        // Prefix matching is case-sensitive.
        assert_eq!(post_title("why not").unwrap(), "why not");
    }

    #[test]
    fn content_length_boundary() {
        assert_eq!(
            post_content(&"a".repeat(249)).unwrap_err(),
            ValidationError::PostContentTooShort
        );
        assert!(post_content(&"a".repeat(250)).is_ok());
        assert_eq!(
            post_content("").unwrap_err(),
            ValidationError::PostContentMissing
        );
    }

    #[test]
    fn content_counts_chars_not_bytes() {
        let content = "é".repeat(250);
        assert!(content.len() > 250);
        assert_eq!(post_content(&content).unwrap(), content);
        assert!(post_content(&"é".repeat(249)).is_err());
    }

    #[test]
    fn summary_is_optional_with_upper_bound() {
        assert_eq!(post_summary(None).unwrap(), None);
        assert_eq!(post_summary(Some("")).unwrap(), Some(String::new()));
        assert!(post_summary(Some(&"s".repeat(250))).is_ok());
        assert_eq!(
            post_summary(Some(&"s".repeat(251))).unwrap_err(),
            ValidationError::PostSummaryTooLong
        );
    }

    #[test]
    fn errors_name_their_field() {
        assert_eq!(ValidationError::AuthorNameTaken.field(), "name");
        assert_eq!(ValidationError::PostCategoryInvalid.field(), "category");
        assert_eq!(
            ValidationError::PhoneNumberWrongLength.to_string(),
            "Phone number must be exactly ten digits"
        );
    }
}
