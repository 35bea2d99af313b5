//! Core use-case services and their shared error type.
//!
//! # Responsibility
//! - Expose DTO-level CRUD over users and books on top of repositories.
//! - Translate repository absence into semantic not-found errors.
//!
//! # Invariants
//! - Services never open transactions; callers (the facade) own the scope.
//! - Write paths validate DTOs before touching the store.

use crate::model::book::BookId;
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_service;
pub mod user_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Externally visible error category.
///
/// Missing request parts and absent entities deliberately share `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Constraint,
    Store,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
            Self::Constraint => "constraint",
            Self::Store => "store",
        }
    }
}

/// Error returned by user/book services and the aggregate facade.
#[derive(Debug)]
pub enum ServiceError {
    /// A required aggregate part (user or book list) is absent.
    MissingData(&'static str),
    /// Target user does not exist.
    UserNotFound(UserId),
    /// Target book does not exist.
    BookNotFound(BookId),
    /// Field-level validation failure.
    Invalid(ValidationError),
    /// Persistence-layer failure, propagated unchanged.
    Repo(RepoError),
    /// Internal mismatch between a write and its result.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Classifies this error for the boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingData(_) | Self::UserNotFound(_) | Self::BookNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Invalid(_) => ErrorKind::Invalid,
            Self::Repo(err) if err.is_constraint_violation() => ErrorKind::Constraint,
            Self::Repo(_) | Self::InconsistentState(_) => ErrorKind::Store,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingData(message) => write!(f, "{message}"),
            Self::UserNotFound(id) => write!(f, "user does not exist in the database: {id}"),
            Self::BookNotFound(id) => write!(f, "book does not exist in the database: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent store state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}
