//! Core of the bookshelf backend: users, the books they own, and the
//! aggregate facade that manages both together.

pub mod db;
pub mod facade;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use facade::UserDataFacade;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{same_book, BookDto, BookId};
pub use model::request::{BookRequest, UserBookRequest, UserBookResponse, UserRequest};
pub use model::user::{UserDto, UserId};
pub use model::validation::ValidationError;
pub use repo::book_repo::{BookRepository, SqliteBookRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::book_service::BookService;
pub use service::user_service::UserService;
pub use service::{ErrorKind, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
