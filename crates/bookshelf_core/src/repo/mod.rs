//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define the entity store contract consumed by the user/book services.
//! - Isolate SQL details from service and facade orchestration.
//!
//! # Invariants
//! - Repositories never translate absence into errors: lookups return
//!   `Option`/empty lists and deletes return affected row counts.
//! - Repositories never open or commit transactions; the caller owns the
//!   transaction scope of the connection they are built on.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by user and book repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Store-level failure, including constraint violations.
    Db(DbError),
    /// A locking read was issued outside any open transaction, so there is
    /// no scope the lock could be held for.
    LockOutsideTransaction,
}

impl RepoError {
    /// Returns whether the store rejected a write because of a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.is_constraint_violation(),
            Self::LockOutsideTransaction => false,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::LockOutsideTransaction => {
                write!(f, "locking read requires an open transaction")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::LockOutsideTransaction => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
