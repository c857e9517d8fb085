//! Event slugs
//!
//! Slugs are case-insensitive and whitespace-insensitive for lookup: the
//! canonical form is trimmed and lower-cased. Stored slugs are assumed to be
//! canonical already.

use std::fmt;

use serde::Serialize;

use super::ValidationError;

/// Maximum length for a slug at the request boundary
const MAX_SLUG_LEN: usize = 256;

/// Canonical (trimmed, lower-cased) event slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Canonicalize any input. Never fails; blank input yields an empty slug
    /// that simply matches no event.
    ///
    /// # Example
    /// ```
    /// use eventhub_server::models::Slug;
    ///
    /// assert_eq!(Slug::normalize("  Summer-Fest  ").as_str(), "summer-fest");
    /// assert!(Slug::normalize("   ").is_empty());
    /// ```
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Validate and canonicalize a slug taken from a request path or CLI arg.
    ///
    /// # Rules
    /// - Must not be empty or whitespace-only
    /// - Max 256 characters after trimming
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let slug = Self::normalize(raw);

        if slug.is_empty() {
            return Err(ValidationError::Empty { field: "slug" });
        }

        if slug.0.chars().count() > MAX_SLUG_LEN {
            return Err(ValidationError::TooLong {
                field: "slug",
                max: MAX_SLUG_LEN,
            });
        }

        Ok(slug)
    }

    /// Get the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
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
