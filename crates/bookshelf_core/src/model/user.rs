//! User (`Person`) record.

use super::validation::{check_length, check_min, ValidationError};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by the store on first insert.
pub type UserId = i64;

pub const FULL_NAME_MIN_CHARS: usize = 2;
pub const FULL_NAME_MAX_CHARS: usize = 50;
pub const USER_TITLE_MIN_CHARS: usize = 2;
pub const USER_TITLE_MAX_CHARS: usize = 30;
pub const MIN_AGE: i64 = 7;

/// User record exchanged between services and the store.
///
/// `id` is `None` until the row has been inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<UserId>,
    pub full_name: String,
    pub title: String,
    pub age: i64,
}

impl UserDto {
    /// Creates an unsaved user record.
    pub fn new(full_name: impl Into<String>, title: impl Into<String>, age: i64) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            title: title.into(),
            age,
        }
    }

    /// Checks field rules: full name 2..=50 chars, title 2..=30 chars, age >= 7.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length(
            "fullName",
            &self.full_name,
            FULL_NAME_MIN_CHARS,
            FULL_NAME_MAX_CHARS,
        )?;
        check_length(
            "title",
            &self.title,
            USER_TITLE_MIN_CHARS,
            USER_TITLE_MAX_CHARS,
        )?;
        check_min("age", self.age, MIN_AGE)
    }
}
