//! Book record and value-equality comparator.

use super::user::UserId;
use super::validation::{check_length, check_min, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by the store on first insert.
pub type BookId = i64;

pub const BOOK_TITLE_MIN_CHARS: usize = 2;
pub const BOOK_TITLE_MAX_CHARS: usize = 70;
pub const AUTHOR_MIN_CHARS: usize = 2;
pub const AUTHOR_MAX_CHARS: usize = 30;
pub const MIN_PAGE_COUNT: i64 = 1;

/// Book record exchanged between services and the store.
///
/// Derived `PartialEq` compares every field including ids; use
/// [`same_book`] for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Option<BookId>,
    pub user_id: Option<UserId>,
    pub title: String,
    pub author: String,
    pub page_count: i64,
}

impl BookDto {
    /// Creates an unsaved, unowned book record.
    pub fn new(title: impl Into<String>, author: impl Into<String>, page_count: i64) -> Self {
        Self {
            id: None,
            user_id: None,
            title: title.into(),
            author: author.into(),
            page_count,
        }
    }

    /// Checks field rules: title 2..=70 chars, author 2..=30 chars, page count > 0.
    ///
    /// Ownership (`user_id`) is not checked here; the store's foreign key
    /// rejects unknown owners.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length(
            "title",
            &self.title,
            BOOK_TITLE_MIN_CHARS,
            BOOK_TITLE_MAX_CHARS,
        )?;
        check_length(
            "author",
            &self.author,
            AUTHOR_MIN_CHARS,
            AUTHOR_MAX_CHARS,
        )?;
        check_min("pageCount", self.page_count, MIN_PAGE_COUNT)
    }
}

/// Returns whether two books describe the same work.
///
/// Only `title`, `author` and `page_count` take part; `id` and `user_id`
/// are ignored.
pub fn same_book(left: &BookDto, right: &BookDto) -> bool {
    left.title == right.title && left.author == right.author && left.page_count == right.page_count
}
