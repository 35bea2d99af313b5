//! Data model shared by repositories, services and the aggregate facade.
//!
//! # Responsibility
//! - Define the `User` and `Book` records exchanged with the store.
//! - Define inbound request shapes and the transient aggregate response.
//! - Own field-level validation rules.
//!
//! # Invariants
//! - `Book.user_id` is stamped by the caller before a book is written.
//! - Book deduplication compares `title`, `author` and `page_count` only.

pub mod book;
pub mod request;
pub mod user;
pub mod validation;
