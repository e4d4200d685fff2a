//! News domain model.
//!
//! # Responsibility
//! - Define the persisted news record and the draft used for writes.
//! - Provide the publishing checks applied by editing front-ends.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes.
//! - `created_at` is assigned by the store on insert and is not touched by
//!   updates.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a news entry.
pub type NewsId = i64;

/// Longest accepted title, counted in characters.
pub const NEWS_TITLE_MAX_CHARS: usize = 200;

/// Milliseconds in one calendar day.
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Persisted news entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub id: NewsId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds, assigned at insert time.
    pub created_at: i64,
}

/// Title/content pair used by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
}

impl NewsDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks draft fields for publishing.
    ///
    /// The store itself accepts any title/content; front-ends call this
    /// before handing a draft to it.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank after trimming.
    /// - `TitleTooLong` when the title exceeds `NEWS_TITLE_MAX_CHARS`.
    /// - `EmptyContent` when the content is blank after trimming.
    pub fn validate(&self) -> Result<(), NewsValidationError> {
        if self.title.trim().is_empty() {
            return Err(NewsValidationError::EmptyTitle);
        }

        let title_chars = self.title.chars().count();
        if title_chars > NEWS_TITLE_MAX_CHARS {
            return Err(NewsValidationError::TitleTooLong {
                chars: title_chars,
                max: NEWS_TITLE_MAX_CHARS,
            });
        }

        if self.content.trim().is_empty() {
            return Err(NewsValidationError::EmptyContent);
        }

        Ok(())
    }
}

/// Draft validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsValidationError {
    EmptyTitle,
    TitleTooLong { chars: usize, max: usize },
    EmptyContent,
}

impl Display for NewsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "news title cannot be empty"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "news title has {chars} characters; at most {max} allowed")
            }
            Self::EmptyContent => write!(f, "news content cannot be empty"),
        }
    }
}

impl Error for NewsValidationError {}

#[cfg(test)]
mod tests {
    use super::{NewsDraft, NewsValidationError, NEWS_TITLE_MAX_CHARS};

    #[test]
    fn validate_accepts_regular_draft() {
        NewsDraft::new("Patch 1.1", "Fixed bugs")
            .validate()
            .expect("regular draft should be valid");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert_eq!(
            NewsDraft::new("   ", "body").validate(),
            Err(NewsValidationError::EmptyTitle)
        );
        assert_eq!(
            NewsDraft::new("title", "\n\t").validate(),
            Err(NewsValidationError::EmptyContent)
        );
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        let at_limit = "é".repeat(NEWS_TITLE_MAX_CHARS);
        NewsDraft::new(at_limit, "body")
            .validate()
            .expect("multi-byte title at the limit should be valid");

        let over = "x".repeat(NEWS_TITLE_MAX_CHARS + 1);
        assert_eq!(
            NewsDraft::new(over, "body").validate(),
            Err(NewsValidationError::TitleTooLong {
                chars: NEWS_TITLE_MAX_CHARS + 1,
                max: NEWS_TITLE_MAX_CHARS,
            })
        );
    }
}
