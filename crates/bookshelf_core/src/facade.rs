//! Aggregate facade over the user and book services.
//!
//! # Responsibility
//! - Compose user and book operations into the four aggregate use-cases.
//! - Own the transaction boundary: one SQLite transaction per call.
//! - Own cross-entity rules: book ownership stamping, value-based book
//!   deduplication on update, and the delete cascade.
//!
//! # Invariants
//! - Every book is stamped with its owner's id before it is written.
//! - A call either commits all of its writes or none of them.
//! - Missing request parts fail before the store is touched.
//! - The facade keeps no state between calls.

use crate::model::book::{same_book, BookDto, BookId};
use crate::model::request::{BookRequest, UserBookRequest, UserBookResponse};
use crate::model::user::{UserDto, UserId};
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::book_service::BookService;
use crate::service::user_service::UserService;
use crate::service::{ServiceError, ServiceResult};
use log::{debug, error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

const MISSING_USER_DATA: &str = "invalid request, missing user data";
const MISSING_BOOK_LIST: &str = "invalid request, the list of books is missing";

/// Services bound to one open transaction.
struct TxServices<'tx> {
    users: UserService<SqliteUserRepository<'tx>>,
    books: BookService<SqliteBookRepository<'tx>>,
}

impl<'tx> TxServices<'tx> {
    fn new(tx: &'tx Transaction<'_>) -> Self {
        Self {
            users: UserService::new(SqliteUserRepository::new(tx)),
            books: BookService::new(SqliteBookRepository::new(tx)),
        }
    }
}

/// Facade exposing user-with-books aggregate operations.
pub struct UserDataFacade<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> UserDataFacade<'conn> {
    /// Creates a facade over a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates a user and all of their books.
    ///
    /// Null book entries are skipped. Returned book ids follow request
    /// order. If any write fails, the user and every book written so far
    /// are rolled back.
    pub fn create_user_with_books(
        &mut self,
        request: &UserBookRequest,
    ) -> ServiceResult<UserBookResponse> {
        let user = required_user(request)?;
        let book_requests = required_books(request)?;

        self.in_transaction("create", TransactionBehavior::Deferred, |services| {
            let created = services.users.create_user(&user)?;
            let user_id = created
                .id
                .ok_or(ServiceError::InconsistentState("created user has no id"))?;

            let mut books_id_list = Vec::with_capacity(book_requests.len());
            for book_request in book_requests.iter().flatten() {
                let book = owned_book(book_request, user_id);
                let saved = services.books.create_book(&book)?;
                books_id_list.push(saved_book_id(&saved)?);
            }

            info!(
                "event=aggregate_create module=facade status=ok user_id={} book_count={}",
                user_id,
                books_id_list.len()
            );
            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
    }

    /// Replaces a user's fields and adds the request's books that the user
    /// does not already own.
    ///
    /// The user row is read with the store write lock held, so concurrent
    /// updates of one user run one after another. Incoming books equal by
    /// value to an owned book are not written. The returned list holds the
    /// ids of the books written by this call, followed by the ids of every
    /// book the user owned before it. Books missing from the request are
    /// kept.
    pub fn update_user_with_books(
        &mut self,
        user_id: UserId,
        request: &UserBookRequest,
    ) -> ServiceResult<UserBookResponse> {
        let user = required_user(request)?;
        let book_requests = required_books(request)?;

        self.in_transaction("update", TransactionBehavior::Immediate, |services| {
            services.users.get_user_by_id_for_update(user_id)?;
            let existing = services.books.get_books_by_user_id(user_id)?;

            let mut books_id_list = Vec::new();
            for book_request in book_requests.iter().flatten() {
                let book = owned_book(book_request, user_id);
                if existing.iter().any(|owned| same_book(owned, &book)) {
                    debug!(
                        "event=aggregate_update module=facade status=skip reason=duplicate_book user_id={user_id}"
                    );
                    continue;
                }
                let saved = services.books.update_book(&book)?;
                books_id_list.push(saved_book_id(&saved)?);
            }
            books_id_list.extend(existing.iter().filter_map(|book| book.id));

            services.users.update_user(&UserDto {
                id: Some(user_id),
                ..user
            })?;

            info!(
                "event=aggregate_update module=facade status=ok user_id={} book_count={}",
                user_id,
                books_id_list.len()
            );
            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
    }

    /// Returns a user's id with the ids of every book they own.
    pub fn get_user_with_books(&mut self, user_id: UserId) -> ServiceResult<UserBookResponse> {
        self.in_transaction("get", TransactionBehavior::Deferred, |services| {
            services.users.get_user_by_id(user_id)?;
            let books_id_list = services
                .books
                .get_books_by_user_id(user_id)?
                .iter()
                .filter_map(|book| book.id)
                .collect();
            Ok(UserBookResponse {
                user_id,
                books_id_list,
            })
        })
    }

    /// Deletes a user together with every book they own.
    ///
    /// Books go first, then the user, in one transaction: a failure at any
    /// step leaves the user and all books in place.
    pub fn delete_user_with_books(&mut self, user_id: UserId) -> ServiceResult<()> {
        self.in_transaction("delete", TransactionBehavior::Deferred, |services| {
            let owned = services.books.get_books_by_user_id(user_id)?;
            for book in &owned {
                services.books.delete_book_by_id(saved_book_id(book)?)?;
            }
            services.users.delete_user_by_id(user_id)?;

            info!(
                "event=aggregate_delete module=facade status=ok user_id={} book_count={}",
                user_id,
                owned.len()
            );
            Ok(())
        })
    }

    /// Runs `work` inside one transaction, committing on success and rolling
    /// back on any error.
    fn in_transaction<T>(
        &mut self,
        operation: &'static str,
        behavior: TransactionBehavior,
        work: impl FnOnce(&TxServices<'_>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let started_at = Instant::now();
        let tx = self.conn.transaction_with_behavior(behavior)?;
        let result = work(&TxServices::new(&tx));

        match result {
            Ok(value) => {
                if let Err(commit_err) = tx.commit() {
                    error!(
                        "event=aggregate_tx module=facade status=error op={} error_code=commit_failed duration_ms={} error={}",
                        operation,
                        started_at.elapsed().as_millis(),
                        commit_err
                    );
                    return Err(commit_err.into());
                }
                debug!(
                    "event=aggregate_tx module=facade status=ok op={} duration_ms={}",
                    operation,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    error!(
                        "event=aggregate_tx module=facade status=error op={operation} error_code=rollback_failed error={rollback_err}"
                    );
                }
                error!(
                    "event=aggregate_tx module=facade status=error op={} error_kind={} duration_ms={} error={}",
                    operation,
                    err.kind().as_str(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn required_user(request: &UserBookRequest) -> ServiceResult<UserDto> {
    request
        .user_request
        .clone()
        .map(UserDto::from)
        .ok_or(ServiceError::MissingData(MISSING_USER_DATA))
}

fn required_books(request: &UserBookRequest) -> ServiceResult<&[Option<BookRequest>]> {
    request
        .book_requests
        .as_deref()
        .ok_or(ServiceError::MissingData(MISSING_BOOK_LIST))
}

fn owned_book(request: &BookRequest, user_id: UserId) -> BookDto {
    BookDto {
        user_id: Some(user_id),
        ..BookDto::from(request.clone())
    }
}

fn saved_book_id(book: &BookDto) -> ServiceResult<BookId> {
    book.id
        .ok_or(ServiceError::InconsistentState("stored book has no id"))
}
