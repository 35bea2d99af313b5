//! Book use-case service.
//!
//! # Invariants
//! - Create and update are the same insert-or-overwrite write; there is no
//!   field-level patch.
//! - No ownership validation: callers stamp `user_id` before writing.

use super::{ServiceError, ServiceResult};
use crate::model::book::{BookDto, BookId};
use crate::model::user::UserId;
use crate::repo::book_repo::BookRepository;
use log::{debug, info, warn};

/// Use-case service over book rows.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and writes one book, returning it with its id.
    pub fn create_book(&self, book: &BookDto) -> ServiceResult<BookDto> {
        book.validate()?;
        let saved = self.repo.save(book)?;
        info!(
            "event=book_save module=book_service status=ok book_id={} user_id={}",
            saved.id.unwrap_or_default(),
            saved.user_id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Alias of [`BookService::create_book`].
    pub fn update_book(&self, book: &BookDto) -> ServiceResult<BookDto> {
        self.create_book(book)
    }

    /// Loads one book or fails with `BookNotFound`.
    pub fn get_book_by_id(&self, id: BookId) -> ServiceResult<BookDto> {
        self.repo
            .find_by_id(id)?
            .ok_or(ServiceError::BookNotFound(id))
    }

    /// Lists every book owned by `user_id`. Never fails for an owner
    /// without books.
    pub fn get_books_by_user_id(&self, user_id: UserId) -> ServiceResult<Vec<BookDto>> {
        let books = self.repo.find_all_by_user_id(user_id)?;
        debug!(
            "event=book_list module=book_service status=ok user_id={user_id} count={}",
            books.len()
        );
        Ok(books)
    }

    /// Deletes one book.
    ///
    /// Zero affected rows and store failures are both reported as
    /// `BookNotFound`; the store error is logged.
    pub fn delete_book_by_id(&self, id: BookId) -> ServiceResult<()> {
        match self.repo.delete_by_id(id) {
            Ok(0) => Err(ServiceError::BookNotFound(id)),
            Ok(_) => {
                info!("event=book_delete module=book_service status=ok book_id={id}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=book_delete module=book_service status=error book_id={id} error={err}"
                );
                Err(ServiceError::BookNotFound(id))
            }
        }
    }
}
