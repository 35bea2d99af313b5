//! Book repository contract and SQLite implementation over `books`.
//!
//! # Invariants
//! - `save` is insert-or-overwrite keyed by `id`; a `None` id inserts.
//! - Ownership is not validated here. A missing or unknown `user_id` is
//!   rejected by the store's `NOT NULL`/foreign key constraints.
//! - `find_all_by_user_id` returns rows ordered by ascending id.

use super::RepoResult;
use crate::model::book::{BookDto, BookId};
use crate::model::user::UserId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    title,
    author,
    page_count
FROM books";

/// Repository interface for book rows.
pub trait BookRepository {
    /// Inserts or fully overwrites one book and returns it with its id.
    fn save(&self, book: &BookDto) -> RepoResult<BookDto>;
    /// Loads one book by id.
    fn find_by_id(&self, id: BookId) -> RepoResult<Option<BookDto>>;
    /// Loads every book owned by `user_id`; empty when there are none.
    fn find_all_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<BookDto>>;
    /// Deletes one book by id and returns the number of deleted rows.
    fn delete_by_id(&self, id: BookId) -> RepoResult<usize>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn save(&self, book: &BookDto) -> RepoResult<BookDto> {
        let id: BookId = self.conn.query_row(
            "INSERT INTO books (id, user_id, title, author, page_count)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (id) DO UPDATE SET
                user_id = excluded.user_id,
                title = excluded.title,
                author = excluded.author,
                page_count = excluded.page_count
             RETURNING id;",
            params![
                book.id,
                book.user_id,
                book.title.as_str(),
                book.author.as_str(),
                book.page_count
            ],
            |row| row.get(0),
        )?;

        Ok(BookDto {
            id: Some(id),
            ..book.clone()
        })
    }

    fn find_by_id(&self, id: BookId) -> RepoResult<Option<BookDto>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn find_all_by_user_id(&self, user_id: UserId) -> RepoResult<Vec<BookDto>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([user_id])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn delete_by_id(&self, id: BookId) -> RepoResult<usize> {
        let deleted = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        Ok(deleted)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<BookDto> {
    Ok(BookDto {
        id: Some(row.get("id")?),
        user_id: Some(row.get("user_id")?),
        title: row.get("title")?,
        author: row.get("author")?,
        page_count: row.get("page_count")?,
    })
}
