//! Inbound aggregate request shapes and the aggregate response.
//!
//! # Invariants
//! - Mapping a request never sets `id` or `user_id`; the facade stamps
//!   ownership after the owning user is known.
//! - `UserBookResponse` is rebuilt on every call and never persisted.

use super::book::{BookDto, BookId};
use super::user::{UserDto, UserId};
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// User part of an aggregate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub full_name: String,
    pub title: String,
    pub age: i64,
}

/// One book entry of an aggregate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub page_count: i64,
}

/// Create/update request for a user together with their books.
///
/// Either part may be structurally absent; the facade rejects such
/// requests. `null` entries inside `book_requests` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookRequest {
    #[serde(default)]
    pub user_request: Option<UserRequest>,
    #[serde(default)]
    pub book_requests: Option<Vec<Option<BookRequest>>>,
}

impl UserBookRequest {
    /// Builds a request with both parts present.
    pub fn new(user: UserRequest, books: Vec<BookRequest>) -> Self {
        Self {
            user_request: Some(user),
            book_requests: Some(books.into_iter().map(Some).collect()),
        }
    }

    /// Validates every present part.
    ///
    /// Absent parts are not reported here; the facade owns that rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(user) = &self.user_request {
            UserDto::from(user.clone()).validate()?;
        }
        for book in self.book_requests.iter().flatten().flatten() {
            BookDto::from(book.clone()).validate()?;
        }
        Ok(())
    }
}

/// Aggregate view returned to callers: the user id and their book ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookResponse {
    pub user_id: UserId,
    pub books_id_list: Vec<BookId>,
}

impl From<UserRequest> for UserDto {
    fn from(value: UserRequest) -> Self {
        Self::new(value.full_name, value.title, value.age)
    }
}

impl From<BookRequest> for BookDto {
    fn from(value: BookRequest) -> Self {
        Self::new(value.title, value.author, value.page_count)
    }
}
