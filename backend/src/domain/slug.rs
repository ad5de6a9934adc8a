//! URL slugs identifying products and blog posts.
//!
//! Slugs are lowercase ASCII letters and digits separated by single hyphens,
//! with no leading or trailing hyphen.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::FieldViolation;

/// Maximum slug length.
pub const SLUG_MAX: usize = 80;

/// Reasons a slug is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugValidationError {
    /// Slug was empty.
    #[error("slug must not be empty")]
    Empty,
    /// Slug longer than [`SLUG_MAX`].
    #[error("slug must be at most {SLUG_MAX} characters")]
    TooLong,
    /// Slug contains disallowed characters or hyphen placement.
    #[error("slug may only contain lowercase letters, digits and single hyphens")]
    InvalidCharacters,
}

impl FieldViolation for SlugValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::Empty => "required",
            Self::TooLong => "invalid_length",
            Self::InvalidCharacters => "invalid_slug",
        }
    }
}

/// Validated slug.
///
/// # Examples
/// ```
/// use site_backend::domain::Slug;
///
/// assert!(Slug::new("volt-s1-pro").is_ok());
/// assert!(Slug::new("Volt S1").is_err());
/// assert!(Slug::new("volt--s1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Validate and construct a slug. Input is not trimmed or lower-cased.
    pub fn new(raw: impl Into<String>) -> Result<Self, SlugValidationError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SlugValidationError::Empty);
        }
        if raw.len() > SLUG_MAX {
            return Err(SlugValidationError::TooLong);
        }
        let allowed = raw
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        let well_placed =
            !raw.starts_with('-') && !raw.ends_with('-') && !raw.contains("--");
        if !(allowed && well_placed) {
            return Err(SlugValidationError::InvalidCharacters);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("s1")]
    #[case("volt-s1-pro")]
    #[case("2025-range-guide")]
    fn accepts(#[case] raw: &str) {
        assert!(Slug::new(raw).is_ok());
    }

    #[rstest]
    #[case("", SlugValidationError::Empty)]
    #[case("-lead", SlugValidationError::InvalidCharacters)]
    #[case("trail-", SlugValidationError::InvalidCharacters)]
    #[case("double--hyphen", SlugValidationError::InvalidCharacters)]
    #[case("Upper", SlugValidationError::InvalidCharacters)]
    #[case("sp ace", SlugValidationError::InvalidCharacters)]
    fn rejects(#[case] raw: &str, #[case] expected: SlugValidationError) {
        assert_eq!(Slug::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong() {
        assert_eq!(Slug::new("a".repeat(SLUG_MAX + 1)), Err(SlugValidationError::TooLong));
    }
}
