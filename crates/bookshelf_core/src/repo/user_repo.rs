//! User repository contract and SQLite implementation over `persons`.
//!
//! # Invariants
//! - `save` is insert-or-overwrite keyed by `id`; a `None` id inserts.
//! - `find_by_id_for_update` holds the store write lock until the enclosing
//!   transaction ends. Release is implicit on commit or rollback.

use super::{RepoError, RepoResult};
use crate::model::user::{UserDto, UserId};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USER_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    title,
    age
FROM persons";

/// Repository interface for user rows.
pub trait UserRepository {
    /// Inserts or fully overwrites one user and returns it with its id.
    fn save(&self, user: &UserDto) -> RepoResult<UserDto>;
    /// Loads one user by id.
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserDto>>;
    /// Loads one user by id while acquiring the write lock for the
    /// enclosing transaction.
    fn find_by_id_for_update(&self, id: UserId) -> RepoResult<Option<UserDto>>;
    /// Deletes one user by id and returns the number of deleted rows.
    fn delete_by_id(&self, id: UserId) -> RepoResult<usize>;
}

/// SQLite-backed user repository.
///
/// Accepts a plain connection or a `rusqlite::Transaction` (via deref).
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn save(&self, user: &UserDto) -> RepoResult<UserDto> {
        let id: UserId = self.conn.query_row(
            "INSERT INTO persons (id, full_name, title, age)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                full_name = excluded.full_name,
                title = excluded.title,
                age = excluded.age
             RETURNING id;",
            params![
                user.id,
                user.full_name.as_str(),
                user.title.as_str(),
                user.age
            ],
            |row| row.get(0),
        )?;

        Ok(UserDto {
            id: Some(id),
            ..user.clone()
        })
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<UserDto>> {
        let user = self
            .conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_id_for_update(&self, id: UserId) -> RepoResult<Option<UserDto>> {
        if self.conn.is_autocommit() {
            return Err(RepoError::LockOutsideTransaction);
        }

        // SQLite has no row locks; a no-op write takes the database RESERVED
        // lock, which blocks other writers until this transaction ends.
        self.conn
            .execute("UPDATE persons SET age = age WHERE id = ?1;", [id])?;
        self.find_by_id(id)
    }

    fn delete_by_id(&self, id: UserId) -> RepoResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM persons WHERE id = ?1;", [id])?;
        Ok(deleted)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<UserDto> {
    Ok(UserDto {
        id: Some(row.get("id")?),
        full_name: row.get("full_name")?,
        title: row.get("title")?,
        age: row.get("age")?,
    })
}
