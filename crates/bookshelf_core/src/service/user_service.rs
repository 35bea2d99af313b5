//! User use-case service.
//!
//! # Invariants
//! - `create_user` always inserts a new row, ignoring any incoming id.
//! - `update_user` is a full overwrite keyed by id.
//! - Failed deletes surface as `UserNotFound`.

use super::{ServiceError, ServiceResult};
use crate::model::user::{UserDto, UserId};
use crate::repo::user_repo::UserRepository;
use log::{info, warn};

/// Use-case service over user rows.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and inserts one user, returning it with the assigned id.
    pub fn create_user(&self, user: &UserDto) -> ServiceResult<UserDto> {
        user.validate()?;
        let created = self.repo.save(&UserDto {
            id: None,
            ..user.clone()
        })?;
        info!(
            "event=user_create module=user_service status=ok user_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    /// Validates and fully overwrites one user (inserting when `id` is unset).
    pub fn update_user(&self, user: &UserDto) -> ServiceResult<UserDto> {
        user.validate()?;
        let updated = self.repo.save(user)?;
        info!(
            "event=user_update module=user_service status=ok user_id={}",
            updated.id.unwrap_or_default()
        );
        Ok(updated)
    }

    /// Loads one user or fails with `UserNotFound`.
    pub fn get_user_by_id(&self, id: UserId) -> ServiceResult<UserDto> {
        self.repo
            .find_by_id(id)?
            .ok_or(ServiceError::UserNotFound(id))
    }

    /// Loads one user and holds the store write lock until the caller's
    /// transaction ends.
    ///
    /// Concurrent callers block in this read until the holder commits, so
    /// they observe its writes rather than a stale snapshot.
    pub fn get_user_by_id_for_update(&self, id: UserId) -> ServiceResult<UserDto> {
        let user = self
            .repo
            .find_by_id_for_update(id)?
            .ok_or(ServiceError::UserNotFound(id))?;
        info!("event=user_lock module=user_service status=ok user_id={id}");
        Ok(user)
    }

    /// Deletes one user.
    ///
    /// Zero affected rows and store failures are both reported as
    /// `UserNotFound`; the store error is logged.
    pub fn delete_user_by_id(&self, id: UserId) -> ServiceResult<()> {
        match self.repo.delete_by_id(id) {
            Ok(0) => Err(ServiceError::UserNotFound(id)),
            Ok(_) => {
                info!("event=user_delete module=user_service status=ok user_id={id}");
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=user_delete module=user_service status=error user_id={id} error={err}"
                );
                Err(ServiceError::UserNotFound(id))
            }
        }
    }
}
